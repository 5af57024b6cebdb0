//! Admin server API client.
//!
//! Provides authenticated HTTP communication with the admin server: the
//! order feed, order status mutations, and the read-only product catalog.
//! The bearer token comes from the injected [`Session`]; nothing here reads
//! ambient state.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::order::Order;
use crate::product::Product;
use crate::session::Session;
use crate::status::OrderStatus;

/// Default timeout for API requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the admin server URL:
/// - strip trailing slashes
/// - strip a trailing `/api` segment (paths already carry it)
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_admin_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    // Ensure scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    // Strip trailing slashes
    while url.ends_with('/') {
        url.pop();
    }

    // Strip trailing /api
    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    // Strip trailing slashes again (in case "/api/" was present)
    while url.ends_with('/') {
        url.pop();
    }

    url
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed exchange with the admin server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    #[error("{0}")]
    Network(String),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("invalid JSON from admin server: {0}")]
    Decode(String),
}

/// Convert a `reqwest::Error` into a user-friendly message.
fn friendly_error(url: &str, err: &reqwest::Error) -> ApiError {
    if err.is_connect() {
        return ApiError::Network(format!("Cannot reach admin server at {url}"));
    }
    if err.is_timeout() {
        return ApiError::Network(format!("Connection to {url} timed out"));
    }
    if err.is_builder() {
        return ApiError::Network(format!("Invalid admin server URL: {url}"));
    }
    ApiError::Network(format!("Network error communicating with {url}: {err}"))
}

/// Convert an HTTP status code into a user-friendly message.
fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Session is invalid or expired".to_string(),
        403 => "Not authorized for this resource".to_string(),
        404 => "Admin server endpoint not found".to_string(),
        s if s >= 500 => format!("Admin server error (HTTP {s})"),
        s => format!("Unexpected response from admin server (HTTP {s})"),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated client for the admin server REST interface.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Arc<RwLock<Session>>,
}

impl ApiClient {
    pub fn new(admin_url: &str, session: Arc<RwLock<Session>>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self {
            base_url: normalize_admin_url(admin_url),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer_token(&self) -> String {
        match self.session.read() {
            Ok(session) => session.token().to_string(),
            Err(poisoned) => poisoned.into_inner().token().to_string(),
        }
    }

    /// Fetch all orders visible to this session's identity. The server
    /// filters by role; branch managers additionally narrow the view
    /// client-side via [`crate::store::OrderStore::by_branch`].
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        let url = format!("{}/api/orders", self.base_url);
        let body = self.get(&url).await?;
        let orders: Vec<Order> =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        info!(count = orders.len(), "fetched orders");
        Ok(orders)
    }

    /// Persist a status change for one order. A 2xx response confirms the
    /// requested status; the response body is not needed.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/orders/{order_id}/status", self.base_url);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(self.bearer_token())
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        let status_code = resp.status();
        if !status_code.is_success() {
            return Err(error_from_response(status_code, resp).await);
        }
        Ok(())
    }

    /// Fetch the product catalog (read-only collaborator; used for stock
    /// availability displays).
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = format!("{}/api/products", self.base_url);
        let body = self.get(&url).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get(&self, url: &str) -> Result<Value, ApiError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(self.bearer_token())
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(error_from_response(status, resp).await);
        }

        let body_text = resp.text().await.unwrap_or_default();
        if body_text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body_text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Build an [`ApiError::Status`], preserving any error detail the server
/// put in the body for diagnostics.
async fn error_from_response(status: StatusCode, resp: reqwest::Response) -> ApiError {
    let fallback = status_message(status);
    let body_text = resp.text().await.unwrap_or_default();

    let message = if let Ok(json) = serde_json::from_str::<Value>(&body_text) {
        json.get("error")
            .or_else(|| json.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(fallback)
    } else if !body_text.trim().is_empty() {
        format!("{fallback}: {}", body_text.trim())
    } else {
        fallback
    };

    warn!(status = status.as_u16(), %message, "admin server request failed");
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

//! Order data model and branch helpers.
//!
//! Orders arrive fully formed from the admin server's checkout flow; the
//! console never creates one. Everything except `status` is immutable once
//! loaded, and `status` only changes through the mutation gateway.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::order_number;
use crate::status::OrderStatus;

/// One customer purchase, as returned by `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned Mongo id.
    #[serde(rename = "_id")]
    pub id: String,
    /// `ORD-YYMMDDhhmmss` — human label and sole source of the creation
    /// instant (see [`crate::order_number`]).
    pub order_number: String,
    /// Fulfilling branch key (`main`, `second`, ...). Kept as a string:
    /// the server may add branches this build has never heard of.
    pub branch: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total: f64,
    #[serde(default)]
    pub payment_method: String,
    pub user: Customer,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: ProductRef,
    pub variant: String,
    pub quantity: u32,
    pub price: f64,
}

/// Denormalized product snapshot inside a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// Denormalized customer snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Order {
    /// Creation instant decoded from the order number, when decodable.
    pub fn decoded_at(&self) -> Option<NaiveDateTime> {
        order_number::decode(&self.order_number).ok()
    }

    /// Creation timestamp for display (`"Invalid date"` on bad numbers).
    pub fn display_timestamp(&self) -> String {
        order_number::display_timestamp(&self.order_number)
    }

    /// Line items grouped by product name, preserving first-seen product
    /// order. Backs the order-details view.
    pub fn items_by_product(&self) -> Vec<(String, Vec<&LineItem>)> {
        let mut grouped: Vec<(String, Vec<&LineItem>)> = Vec::new();
        for item in &self.items {
            match grouped.iter_mut().find(|(name, _)| *name == item.product.name) {
                Some((_, items)) => items.push(item),
                None => grouped.push((item.product.name.clone(), vec![item])),
            }
        }
        grouped
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Branch keys this build knows labels for, in display order.
pub const KNOWN_BRANCHES: &[&str] = &["main", "second", "third", "fourth"];

/// Human-readable label for a branch key. Unknown branches fall back to a
/// capitalized key so new server-side branches still render.
pub fn branch_label(branch: &str) -> String {
    match branch {
        "main" => "Main Branch - Piy Margal".to_string(),
        "second" => "Second Branch - Honradez".to_string(),
        "third" => "Third Branch - G. Tuazon".to_string(),
        "fourth" => "Fourth Branch".to_string(),
        other => capitalize(other),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn test_order(
    id: &str,
    order_number: &str,
    branch: &str,
    status: OrderStatus,
) -> Order {
    Order {
        id: id.to_string(),
        order_number: order_number.to_string(),
        branch: branch.to_string(),
        status,
        items: vec![LineItem {
            product: ProductRef {
                id: Some("p1".to_string()),
                name: "Juice".to_string(),
            },
            variant: "Mango 30ml".to_string(),
            quantity: 2,
            price: 150.0,
        }],
        total: 300.0,
        payment_method: "cash".to_string(),
        user: Customer {
            name: "Test Customer".to_string(),
            contact: Some("0917-000-0000".to_string()),
        },
    }
}

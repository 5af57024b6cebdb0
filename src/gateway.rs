//! Order status mutation gateway.
//!
//! The single path through which an order's status changes. A requested
//! transition is validated locally first (invalid requests never reach the
//! network), then persisted remotely, and only a confirmed response patches
//! the local snapshot — so the store always holds last-known-good state and
//! no rollback is ever needed.

use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::order::Order;
use crate::status::{self, OrderStatus};
use crate::store::OrderStore;

/// Why a status change request did not go through.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Rejected locally by the status machine; no network call was made.
    #[error("cannot move an order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    /// The order id is not in the current snapshot.
    #[error("order {0} is not in the current snapshot")]
    NotFound(String),
    /// The admin server rejected or never received the mutation; the local
    /// snapshot is unchanged.
    #[error("status update was not persisted: {0}")]
    RemoteRejected(#[from] ApiError),
}

pub struct OrderMutationGateway {
    api: ApiClient,
    store: Arc<Mutex<OrderStore>>,
}

impl OrderMutationGateway {
    pub fn new(api: ApiClient, store: Arc<Mutex<OrderStore>>) -> Self {
        Self { api, store }
    }

    /// Request `order_id` → `new_status`.
    ///
    /// Exactly one network call per invocation, exactly one store mutation
    /// per successful invocation, zero mutations on any failure. Two
    /// concurrent requests for the same order are not coordinated: the
    /// last response to arrive wins in the store.
    pub async fn request_status_change(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> Result<Order, MutationError> {
        let current = self
            .lock_store()
            .get(order_id)
            .cloned()
            .ok_or_else(|| MutationError::NotFound(order_id.to_string()))?;

        if !status::can_transition(current.status, new_status) {
            warn!(
                %order_id,
                from = %current.status,
                to = %new_status,
                "transition rejected locally"
            );
            return Err(MutationError::InvalidTransition {
                from: current.status,
                to: new_status,
            });
        }

        self.api.update_order_status(order_id, new_status).await?;

        // Remote confirmed: apply the same transition to the snapshot. If a
        // reload removed the order while the request was in flight, report
        // rather than resurrecting it.
        let updated = self
            .lock_store()
            .patch_status(order_id, new_status)
            .ok_or_else(|| MutationError::NotFound(order_id.to_string()))?;

        info!(%order_id, status = %new_status, "order status change confirmed");
        Ok(updated)
    }

    /// Notification text shown after a confirmed change (see
    /// [`crate::notice::NoticeBoard`]).
    pub fn success_notice(order: &Order) -> String {
        format!(
            "Order #{} status updated to {}",
            order.order_number, order.status
        )
    }

    fn lock_store(&self) -> MutexGuard<'_, OrderStore> {
        match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::test_order;
    use crate::session::{test_session, Role};
    use std::sync::RwLock;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_with(
        server_uri: &str,
        orders: Vec<Order>,
    ) -> (OrderMutationGateway, Arc<Mutex<OrderStore>>) {
        let mut store = OrderStore::new();
        store.load(orders);
        let store = Arc::new(Mutex::new(store));
        let session = Arc::new(RwLock::new(test_session(Role::BranchManager, Some("main"))));
        let api = ApiClient::new(server_uri, session).expect("build client");
        (OrderMutationGateway::new(api, store.clone()), store)
    }

    #[tokio::test]
    async fn confirmed_change_issues_one_put_and_patches_only_that_order() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/o1/status"))
            .and(body_json(serde_json::json!({ "status": "Preparing" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, store) = gateway_with(
            &server.uri(),
            vec![
                test_order("o1", "ORD-240315143000", "main", OrderStatus::OrderReceived),
                test_order("o2", "ORD-240315142000", "main", OrderStatus::OrderReceived),
            ],
        );

        let updated = gateway
            .request_status_change("o1", OrderStatus::Preparing)
            .await
            .expect("change should succeed");
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(
            OrderMutationGateway::success_notice(&updated),
            "Order #ORD-240315143000 status updated to Preparing"
        );

        let store = store.lock().unwrap();
        assert_eq!(store.get("o1").map(|o| o.status), Some(OrderStatus::Preparing));
        assert_eq!(
            store.get("o2").map(|o| o.status),
            Some(OrderStatus::OrderReceived),
            "unrelated order must not change"
        );
    }

    #[tokio::test]
    async fn invalid_transition_never_touches_network_or_store() {
        let server = MockServer::start().await;
        // Any PUT reaching the mock is a failure.
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, store) = gateway_with(
            &server.uri(),
            vec![test_order(
                "o1",
                "ORD-240315143000",
                "main",
                OrderStatus::PickedUp,
            )],
        );

        let err = gateway
            .request_status_change("o1", OrderStatus::Preparing)
            .await
            .expect_err("Picked Up is terminal");
        assert!(matches!(
            err,
            MutationError::InvalidTransition {
                from: OrderStatus::PickedUp,
                to: OrderStatus::Preparing
            }
        ));
        assert_eq!(
            store.lock().unwrap().get("o1").map(|o| o.status),
            Some(OrderStatus::PickedUp)
        );
    }

    #[tokio::test]
    async fn reopening_a_canceled_order_is_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/o1/status"))
            .and(body_json(serde_json::json!({ "status": "Order Received" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _store) = gateway_with(
            &server.uri(),
            vec![test_order(
                "o1",
                "ORD-240315143000",
                "main",
                OrderStatus::Canceled,
            )],
        );

        let updated = gateway
            .request_status_change("o1", OrderStatus::OrderReceived)
            .await
            .expect("reopen should succeed");
        assert_eq!(updated.status, OrderStatus::OrderReceived);
    }

    #[tokio::test]
    async fn remote_failure_leaves_snapshot_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/o1/status"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, store) = gateway_with(
            &server.uri(),
            vec![test_order(
                "o1",
                "ORD-240315143000",
                "main",
                OrderStatus::OrderReceived,
            )],
        );

        let err = gateway
            .request_status_change("o1", OrderStatus::Preparing)
            .await
            .expect_err("server rejected");
        assert!(matches!(err, MutationError::RemoteRejected(_)));
        assert_eq!(
            store.lock().unwrap().get("o1").map(|o| o.status),
            Some(OrderStatus::OrderReceived),
            "failed mutation must not change the snapshot"
        );
    }

    #[tokio::test]
    async fn unknown_order_is_reported_without_a_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, _store) = gateway_with(&server.uri(), vec![]);
        let err = gateway
            .request_status_change("ghost", OrderStatus::Preparing)
            .await
            .expect_err("order is absent");
        assert!(matches!(err, MutationError::NotFound(_)));
    }
}

//! Order fulfillment lifecycle.
//!
//! The status machine is a pure validator/reducer: it decides which
//! transitions the console may request and produces the post-transition
//! order value. It never performs I/O — the mutation gateway consumes it
//! before anything touches the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::order::Order;

/// Fulfillment state of an order, using the admin server's wire strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum OrderStatus {
    #[serde(rename = "Order Received")]
    OrderReceived,
    #[serde(rename = "Preparing")]
    Preparing,
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    #[serde(rename = "Picked Up")]
    PickedUp,
    #[serde(rename = "Canceled")]
    Canceled,
}

/// All statuses in board-column order.
pub const ALL_STATUSES: [OrderStatus; 5] = [
    OrderStatus::OrderReceived,
    OrderStatus::Preparing,
    OrderStatus::ReadyForPickup,
    OrderStatus::PickedUp,
    OrderStatus::Canceled,
];

impl OrderStatus {
    /// The exact string the admin server stores and returns.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::OrderReceived => "Order Received",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::ReadyForPickup => "Ready for Pickup",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// Whether the forward flow ends here. `Canceled` is terminal for the
    /// forward flow but can still be reopened; `Picked Up` has no exit at
    /// all.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::PickedUp | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Order Received" => Ok(OrderStatus::OrderReceived),
            "Preparing" => Ok(OrderStatus::Preparing),
            "Ready for Pickup" => Ok(OrderStatus::ReadyForPickup),
            // The pickup board column was historically labeled "Completed";
            // the drag layer still sends that id.
            "Picked Up" | "Completed" => Ok(OrderStatus::PickedUp),
            "Canceled" => Ok(OrderStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status string the machine does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0:?}")]
pub struct UnknownStatus(pub String);

/// Whether the console may request `from -> to`.
///
/// The flow is deliberately not strictly linear — a manager may jump an
/// order straight from `Order Received` to `Picked Up`. The constraints
/// are: no self-transition, nothing leaves `Picked Up`, `Canceled` only
/// reopens to `Order Received`, and `Order Received` is otherwise never a
/// target.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    if from == to {
        return false;
    }
    match from {
        OrderStatus::PickedUp => false,
        OrderStatus::Canceled => to == OrderStatus::OrderReceived,
        _ => to != OrderStatus::OrderReceived,
    }
}

/// Statuses reachable from `from`, in board-column order. Drives which
/// action buttons the UI offers.
pub fn allowed_targets(from: OrderStatus) -> Vec<OrderStatus> {
    ALL_STATUSES
        .into_iter()
        .filter(|to| can_transition(from, *to))
        .collect()
}

/// Produce the post-transition order value. Pure: only `status` changes,
/// every other field is carried over untouched.
pub fn apply_transition(order: &Order, to: OrderStatus) -> Order {
    let mut updated = order.clone();
    updated.status = to;
    updated
}

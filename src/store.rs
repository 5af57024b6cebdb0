//! In-memory order snapshot.
//!
//! The store holds the authoritative local copy of every order visible to
//! the current session. It is replaced wholesale by `load` after a fetch
//! and patched in place by the mutation gateway after a confirmed status
//! change — no other write path exists. Mutations are applied synchronously
//! under the caller's lock, so a fetched response lands atomically.

use tracing::{info, warn};

use crate::order::{Order, KNOWN_BRANCHES};
use crate::status::OrderStatus;

/// Orders shown per page in list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire snapshot. Last write wins — no merge logic.
    ///
    /// Orders are resorted by decoded creation instant, newest first;
    /// orders whose number does not decode keep their relative order and
    /// sort last. Duplicate ids violate the snapshot invariant and are
    /// dropped (first occurrence wins).
    pub fn load(&mut self, mut orders: Vec<Order>) {
        let before = orders.len();
        let mut seen = std::collections::HashSet::new();
        orders.retain(|order| {
            if seen.insert(order.id.clone()) {
                true
            } else {
                warn!(order_id = %order.id, "duplicate order id in snapshot, dropping");
                false
            }
        });

        orders.sort_by(|a, b| {
            // Descending by instant; None (undecodable) after Some.
            match (a.decoded_at(), b.decoded_at()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });

        info!(
            loaded = orders.len(),
            dropped = before - orders.len(),
            "order snapshot replaced"
        );
        self.orders = orders;
    }

    /// The full snapshot, newest first.
    pub fn snapshot(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Orders with the given status, in snapshot order.
    pub fn by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    /// Orders fulfilled by the given branch, in snapshot order.
    pub fn by_branch(&self, branch: &str) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| o.branch == branch)
            .cloned()
            .collect()
    }

    /// Branch keys present in the snapshot: known branches first in their
    /// fixed display order, then unknown branches in encounter order.
    pub fn branches(&self) -> Vec<String> {
        let mut result: Vec<String> = KNOWN_BRANCHES
            .iter()
            .filter(|key| self.orders.iter().any(|o| o.branch == **key))
            .map(|key| key.to_string())
            .collect();
        for order in &self.orders {
            if !result.iter().any(|b| *b == order.branch) {
                result.push(order.branch.clone());
            }
        }
        result
    }

    /// Per-branch views in display order. Backs the owner's branch summary
    /// tables.
    pub fn orders_by_branch(&self) -> Vec<(String, Vec<Order>)> {
        self.branches()
            .into_iter()
            .map(|branch| {
                let orders = self.by_branch(&branch);
                (branch, orders)
            })
            .collect()
    }

    /// Patch exactly one order's status in place. Returns the updated order,
    /// or `None` (reported, not fatal) when the id is absent — e.g. the
    /// snapshot was reloaded underneath a stale mutation. Never reorders
    /// unrelated entries.
    pub fn patch_status(&mut self, order_id: &str, new_status: OrderStatus) -> Option<Order> {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) => {
                let from = order.status;
                order.status = new_status;
                info!(%order_id, %from, to = %new_status, "order status patched");
                Some(order.clone())
            }
            None => {
                warn!(%order_id, "patch_status: order not in snapshot");
                None
            }
        }
    }
}

/// 1-indexed page slice with clamping: a page below 1 reads as page 1, a
/// page beyond the end reads as the last page. An empty list yields an
/// empty page. Clamping (rather than erroring) keeps pager buttons safe to
/// mash.
pub fn paginate(list: &[Order], page: usize, page_size: usize) -> &[Order] {
    if list.is_empty() || page_size == 0 {
        return &[];
    }
    let max_page = list.len().div_ceil(page_size);
    let page = page.clamp(1, max_page);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(list.len());
    &list[start..end]
}

/// Number of pages a list occupies (at least 1 for a non-empty list).
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::test_order;

    fn store_with(orders: Vec<Order>) -> OrderStore {
        let mut store = OrderStore::new();
        store.load(orders);
        store
    }

    #[test]
    fn load_sorts_newest_first_with_undecodable_last() {
        let store = store_with(vec![
            test_order("a", "ORD-240101090000", "main", OrderStatus::PickedUp),
            test_order("b", "ORD-bad", "main", OrderStatus::PickedUp),
            test_order("c", "ORD-240315143000", "main", OrderStatus::PickedUp),
            test_order("d", "ORD-231231235959", "main", OrderStatus::PickedUp),
        ]);

        let ids: Vec<&str> = store.snapshot().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn load_drops_duplicate_ids_keeping_the_first() {
        let mut first = test_order("dup", "ORD-240315143000", "main", OrderStatus::Preparing);
        first.total = 100.0;
        let mut second = test_order("dup", "ORD-240315143000", "second", OrderStatus::Canceled);
        second.total = 999.0;

        let store = store_with(vec![first, second]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("dup").map(|o| o.total), Some(100.0));
    }

    #[test]
    fn by_branch_returns_exactly_that_subset_in_snapshot_order() {
        let store = store_with(vec![
            test_order("a", "ORD-240315143000", "main", OrderStatus::PickedUp),
            test_order("b", "ORD-240315142000", "second", OrderStatus::PickedUp),
            test_order("c", "ORD-240315141000", "third", OrderStatus::PickedUp),
            test_order("d", "ORD-240315140000", "second", OrderStatus::Preparing),
        ]);

        let second = store.by_branch("second");
        let ids: Vec<&str> = second.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn by_status_filters_without_reordering() {
        let store = store_with(vec![
            test_order("a", "ORD-240315143000", "main", OrderStatus::Preparing),
            test_order("b", "ORD-240315142000", "main", OrderStatus::PickedUp),
            test_order("c", "ORD-240315141000", "second", OrderStatus::Preparing),
        ]);

        let preparing = store.by_status(OrderStatus::Preparing);
        let ids: Vec<&str> = preparing.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn branches_lists_known_first_then_unknown_in_encounter_order() {
        let store = store_with(vec![
            test_order("a", "ORD-240315143000", "popup", OrderStatus::PickedUp),
            test_order("b", "ORD-240315142000", "third", OrderStatus::PickedUp),
            test_order("c", "ORD-240315141000", "main", OrderStatus::PickedUp),
        ]);

        assert_eq!(store.branches(), vec!["main", "third", "popup"]);
    }

    #[test]
    fn paginate_slices_and_clamps() {
        let orders: Vec<Order> = (0..25)
            .map(|i| {
                test_order(
                    &format!("o{i}"),
                    "ORD-240315143000",
                    "main",
                    OrderStatus::PickedUp,
                )
            })
            .collect();

        // Page 3 of 10 holds the 5 remaining items.
        let page3 = paginate(&orders, 3, 10);
        assert_eq!(page3.len(), 5);
        assert_eq!(page3[0].id, "o20");
        assert_eq!(page3[4].id, "o24");

        // Out-of-range pages clamp instead of erroring.
        let clamped_high = paginate(&orders, 99, 10);
        assert_eq!(clamped_high.len(), 5);
        assert_eq!(clamped_high[0].id, "o20");

        let clamped_low = paginate(&orders, 0, 10);
        assert_eq!(clamped_low.len(), 10);
        assert_eq!(clamped_low[0].id, "o0");

        assert!(paginate(&[], 1, 10).is_empty());
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn patch_status_updates_one_order_and_nothing_else() {
        let mut store = store_with(vec![
            test_order("a", "ORD-240315143000", "main", OrderStatus::OrderReceived),
            test_order("b", "ORD-240315142000", "main", OrderStatus::OrderReceived),
        ]);

        let updated = store
            .patch_status("b", OrderStatus::Preparing)
            .expect("order exists");
        assert_eq!(updated.status, OrderStatus::Preparing);

        // Unrelated entry untouched, order preserved.
        let ids: Vec<&str> = store.snapshot().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.get("a").map(|o| o.status), Some(OrderStatus::OrderReceived));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn patch_status_reports_missing_ids() {
        let mut store = store_with(vec![test_order(
            "a",
            "ORD-240315143000",
            "main",
            OrderStatus::OrderReceived,
        )]);
        assert!(store.patch_status("ghost", OrderStatus::Preparing).is_none());
        assert_eq!(store.len(), 1);
    }
}

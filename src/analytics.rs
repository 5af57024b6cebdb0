//! Branch analytics rollups.
//!
//! Pure functions over an order snapshot: same input, same output, so the
//! poller can recompute on a timer without drift. Creation dates come from
//! the order-number codec; orders whose number does not decode simply fall
//! out of date-scoped rollups.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::order::Order;
use crate::status::OrderStatus;

// ---------------------------------------------------------------------------
// Same-day report
// ---------------------------------------------------------------------------

/// Per-branch rollup for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub branches: BTreeMap<String, BranchDaily>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct BranchDaily {
    pub total_orders: usize,
    /// Sum of `total` over `Picked Up` orders only. Canceled or pending
    /// orders never contribute revenue.
    pub revenue: f64,
    pub status_counts: BTreeMap<OrderStatus, usize>,
}

/// Roll up the orders whose decoded creation date equals `as_of`, grouped
/// by branch.
pub fn compute_daily_analytics(orders: &[Order], as_of: NaiveDate) -> DailyReport {
    let mut branches: BTreeMap<String, BranchDaily> = BTreeMap::new();

    for order in orders {
        let Some(created) = order.decoded_at() else {
            continue;
        };
        if created.date() != as_of {
            continue;
        }

        let entry = branches.entry(order.branch.clone()).or_default();
        entry.total_orders += 1;
        *entry.status_counts.entry(order.status).or_insert(0) += 1;
        if order.status == OrderStatus::PickedUp {
            entry.revenue += order.total;
        }
    }

    DailyReport {
        date: as_of,
        branches,
    }
}

// ---------------------------------------------------------------------------
// All-time branch statistics (owner dashboard)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchStatistics {
    pub total_orders: usize,
    /// Gross sales across all statuses (the owner dashboard's "Total
    /// Sales" card, distinct from picked-up-only `revenue`).
    pub total_sales: f64,
    pub average_order_value: f64,
}

pub fn compute_branch_statistics(orders: &[Order]) -> BTreeMap<String, BranchStatistics> {
    let mut totals: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for order in orders {
        let entry = totals.entry(order.branch.clone()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += order.total;
    }

    totals
        .into_iter()
        .map(|(branch, (count, sales))| {
            let average = if count > 0 { sales / count as f64 } else { 0.0 };
            (
                branch,
                BranchStatistics {
                    total_orders: count,
                    total_sales: sales,
                    average_order_value: average,
                },
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Time-frame order counts (owner dashboard charts)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct TimeFrameCounts {
    /// Orders created on `today`.
    pub daily: usize,
    /// Orders created within the last 7 days (today inclusive).
    pub weekly: usize,
    /// Orders created in `today`'s calendar month.
    pub monthly: usize,
    /// Orders created within `today`'s rolling three-month window.
    pub quarterly: usize,
}

/// Per-branch order counts for the dashboard's daily/weekly/monthly/
/// quarterly charts. Future-dated orders (clock skew on a terminal) are
/// ignored.
pub fn orders_by_time_frame(
    orders: &[Order],
    today: NaiveDate,
) -> BTreeMap<String, TimeFrameCounts> {
    let mut result: BTreeMap<String, TimeFrameCounts> = BTreeMap::new();

    for order in orders {
        let Some(created) = order.decoded_at() else {
            continue;
        };
        let date = created.date();
        if date > today {
            continue;
        }

        let counts = result.entry(order.branch.clone()).or_default();
        let diff_days = (today - date).num_days();
        let diff_months = (today.year() * 12 + today.month() as i32)
            - (date.year() * 12 + date.month() as i32);

        if diff_days == 0 {
            counts.daily += 1;
        }
        if diff_days < 7 {
            counts.weekly += 1;
        }
        if diff_months == 0 {
            counts.monthly += 1;
        }
        if (0..3).contains(&diff_months) {
            counts.quarterly += 1;
        }
    }

    result
}

/// Total units sold across a snapshot (sum of line-item quantities).
pub fn total_items_sold(orders: &[Order]) -> u64 {
    orders
        .iter()
        .flat_map(|o| &o.items)
        .map(|item| u64::from(item.quantity))
        .sum()
}

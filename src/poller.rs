//! Periodic analytics refresh.
//!
//! A cancellable background task that re-runs the fetch-then-aggregate
//! pipeline: pull the order feed, atomically reload the snapshot, recompute
//! the daily report. Ticks are skipped while a fetch is still in flight, so
//! overlapping refreshes cannot interleave.

use chrono::Local;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analytics::{compute_daily_analytics, DailyReport};
use crate::api::ApiClient;
use crate::store::OrderStore;

/// Default refresh cadence for dashboard analytics.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Handle to the running refresh task.
pub struct AnalyticsPoller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    report: Arc<Mutex<Option<DailyReport>>>,
}

impl AnalyticsPoller {
    /// Spawn the refresh loop. The first refresh runs immediately; later
    /// ones follow `interval`. Fetch failures keep the last-known-good
    /// report in place.
    pub fn start(api: ApiClient, store: Arc<Mutex<OrderStore>>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let report: Arc<Mutex<Option<DailyReport>>> = Arc::new(Mutex::new(None));

        let task_cancel = cancel.clone();
        let task_report = Arc::clone(&report);
        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "analytics poller started");
            let mut ticker = tokio::time::interval(interval);
            // A slow fetch must not cause a burst of catch-up ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        info!("analytics poller stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        refresh_once(&api, &store, &task_report).await;
                    }
                }
            }
        });

        Self {
            cancel,
            handle,
            report,
        }
    }

    /// The most recently computed report, if any refresh has succeeded.
    pub fn latest(&self) -> Option<DailyReport> {
        match self.report.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Cancel the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

async fn refresh_once(
    api: &ApiClient,
    store: &Arc<Mutex<OrderStore>>,
    report: &Arc<Mutex<Option<DailyReport>>>,
) {
    let orders = match api.fetch_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            warn!("analytics refresh failed: {e}");
            return;
        }
    };

    let snapshot = {
        let mut store = match store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        store.load(orders);
        store.snapshot().to_vec()
    };

    let today = Local::now().date_naive();
    let fresh = compute_daily_analytics(&snapshot, today);
    match report.lock() {
        Ok(mut guard) => *guard = Some(fresh),
        Err(poisoned) => *poisoned.into_inner() = Some(fresh),
    }
}

//! Escobar Vape Shop admin console — headless core.
//!
//! The order workflow and analytics engine behind the multi-branch admin
//! console: session context, admin server API client, in-memory order
//! snapshot, validated status transitions, and per-branch rollups. A UI
//! layer drives the gateway and renders the store/analytics outputs; it
//! never mutates state directly.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod analytics;
pub mod api;
pub mod gateway;
pub mod notice;
pub mod order;
pub mod order_number;
pub mod poller;
pub mod product;
pub mod session;
pub mod status;
pub mod store;

pub use analytics::{compute_daily_analytics, DailyReport};
pub use api::{ApiClient, ApiError};
pub use gateway::{MutationError, OrderMutationGateway};
pub use order::Order;
pub use order_number::DecodeError;
pub use poller::AnalyticsPoller;
pub use product::Product;
pub use session::{Role, Session, UserIdentity};
pub use status::OrderStatus;
pub use store::OrderStore;

/// Initialize structured logging (console, plus a rolling daily file when
/// `log_dir` is given). Returns the appender guard — hold it for the
/// process lifetime, dropping it flushes pending log lines.
pub fn init_tracing(
    log_dir: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,escobar_admin_core=debug"));

    let console_layer = fmt::layer().with_target(true);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok();
            let file_appender = tracing_appender::rolling::daily(dir, "admin-core");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            None
        }
    }
}

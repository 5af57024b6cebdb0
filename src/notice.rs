//! Transient UI notifications.
//!
//! A confirmed status change posts a short success message that dismisses
//! itself after a fixed interval. The board keeps at most one message; a
//! newer post supersedes an older one, and the older post's expiry timer
//! must never clear the newer message (generation counter).

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// How long a notice stays visible.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Default)]
struct BoardState {
    message: Option<String>,
    generation: u64,
}

/// Shared holder for the currently visible notice.
#[derive(Clone, Default)]
pub struct NoticeBoard {
    state: Arc<Mutex<BoardState>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a message and schedule its dismissal after [`DISMISS_AFTER`].
    pub fn post(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "notice posted");
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.message = Some(message);
            state.generation
        };

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            let mut state = match state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Only clear if no newer notice replaced this one.
            if state.generation == generation {
                state.message = None;
            }
        });
    }

    /// The currently visible message, if any.
    pub fn current(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// Clear immediately (e.g. on navigation).
    pub fn dismiss(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.message = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

//! Shared application state and the window reset task.
//!
//! # Structured Concurrency
//!
//! The reset task is spawned on a `tokio_util::task::TaskTracker` and listens
//! to a `CancellationToken`. Call `shutdown()` to stop it before exit.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::config::Config;
use crate::counter::WindowCounter;
use crate::error::AppResult;
use crate::metrics;

/// Shared application state.
///
/// Cloning is cheap; all fields are reference counted.
///
/// # Lifecycle
///
/// The reset task starts as soon as the state is created:
///
/// ```rust,ignore
/// let state = AppState::new(&config)?;
/// // ... serve ...
/// state.shutdown().await;
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Window counter shared by the middleware and the reset task
    pub counter: Arc<WindowCounter>,
    task_tracker: TaskTracker,
    cancellation_token: CancellationToken,
}

impl AppState {
    /// Build the state and start the reset task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RateLimit` if the configured limit or window is zero.
    pub fn new(config: &Config) -> AppResult<Self> {
        let counter = Arc::new(WindowCounter::new(config.max_requests, config.window)?);

        let state = Self {
            counter,
            task_tracker: TaskTracker::new(),
            cancellation_token: CancellationToken::new(),
        };

        state.spawn_reset_task();

        Ok(state)
    }

    /// Spawn the task that clears the counter at the end of every window.
    fn spawn_reset_task(&self) {
        let counter = self.counter.clone();
        let window = counter.window();
        let cancel = self.cancellation_token.clone();

        self.task_tracker.spawn(run_reset_loop(counter, window, cancel));
    }

    /// Stop the reset task and wait for it to finish.
    pub async fn shutdown(&self) {
        info!("Stopping window reset task");

        self.cancellation_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;

        info!("Window reset task stopped");
    }
}

/// Sleep for `window`, reset, repeat until cancelled.
///
/// Each sleep is measured from the end of the previous reset, so small delays
/// accumulate over time instead of being corrected against a fixed schedule.
pub async fn run_reset_loop(
    counter: Arc<WindowCounter>,
    window: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("Reset task received cancellation signal");
                break;
            }
            _ = sleep(window) => {
                let cleared = counter.reset_to_zero();
                metrics::record_window_reset(cleared);
                debug!(cleared, "Rate limit window reset");
            }
        }
    }

    debug!("Reset task shutting down");
}

// src/feed/poller.rs
//! Recurring fetch-and-deliver loop with an explicit stop handle

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::client::JobFeed;
use crate::types::Job;

/// Default cadence between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Shorter intervals (including zero) are raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Stop capability returned by [`start_polling`].
///
/// Stopping prevents future ticks. A fetch already in flight still completes
/// and delivers; callers discard it with their own lifecycle guard.
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            info!("Stopping job feed polling");
            self.token.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the polling task to wind down after [`PollHandle::stop`]
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Fetch once immediately, then every `interval`, handing each full job list
/// to `on_update`. An `interval` below [`MIN_POLL_INTERVAL`] is clamped.
pub fn start_polling<F, U>(feed: Arc<F>, interval: Duration, mut on_update: U) -> PollHandle
where
    F: JobFeed + ?Sized + 'static,
    U: FnMut(Vec<Job>) + Send + 'static,
{
    let interval = interval.max(MIN_POLL_INTERVAL);
    let token = CancellationToken::new();
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = interval.as_secs(), "Started job feed polling");

        loop {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                _ = ticker.tick() => {
                    let jobs = feed.fetch_jobs().await;
                    debug!(count = jobs.len(), "Delivering job list");
                    on_update(jobs);
                }
            }
        }

        debug!("Job feed polling task finished");
    });

    PollHandle { token, task }
}

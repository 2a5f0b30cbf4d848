// src/dashboard.rs
//! Root composition: owns the job list and filter state, wires the poller in
//! and derives the filtered list and "last updated" timestamp.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::feed::{start_polling, JobFeed, PollHandle};
use crate::filters::{apply_filters_at, FilterState};
use crate::time_utils::{is_sentinel, parse_instant};
use crate::types::Job;

/// Snapshot of everything the dashboard renders from.
///
/// Updates produce a new value; the job list itself is shared and never
/// modified.
#[derive(Debug, Clone)]
pub struct DashboardState {
    jobs: Arc<[Job]>,
    filters: FilterState,
    loading: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            jobs: Arc::from(Vec::new()),
            filters: FilterState::default(),
            loading: true,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the job list wholesale; the first delivery ends loading
    pub fn with_jobs(&self, jobs: Vec<Job>) -> Self {
        Self {
            jobs: Arc::from(jobs),
            filters: self.filters.clone(),
            loading: false,
        }
    }

    pub fn with_filters(&self, filters: FilterState) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            filters,
            loading: self.loading,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn filtered_jobs(&self) -> Vec<Job> {
        self.filtered_jobs_at(Utc::now())
    }

    pub fn filtered_jobs_at(&self, now: DateTime<Utc>) -> Vec<Job> {
        apply_filters_at(&self.jobs, &self.filters, now)
    }

    /// Most recent parseable posting date in the current list
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.jobs
            .iter()
            .map(|job| parse_instant(&job.posted_date))
            .filter(|instant| !is_sentinel(instant))
            .max()
    }
}

/// Mounted dashboard: state plus the live poller subscription
pub struct Dashboard {
    state: DashboardState,
    updates: mpsc::UnboundedReceiver<Vec<Job>>,
    poller: Option<PollHandle>,
}

impl Dashboard {
    /// Subscribe to `feed`; the first delivery arrives right away
    pub fn mount<F>(feed: Arc<F>, interval: Duration) -> Self
    where
        F: JobFeed + ?Sized + 'static,
    {
        let (tx, updates) = mpsc::unbounded_channel();
        let poller = start_polling(feed, interval, move |jobs| {
            if tx.send(jobs).is_err() {
                debug!("Dashboard unmounted, dropping job delivery");
            }
        });

        info!("Dashboard mounted");
        Self {
            state: DashboardState::new(),
            updates,
            poller: Some(poller),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.state = self.state.with_filters(filters);
    }

    /// Apply one delivered job list, replacing the current one
    pub fn apply_delivery(&mut self, jobs: Vec<Job>) {
        if !self.is_mounted() {
            debug!("Ignoring job delivery after unmount");
            return;
        }
        info!(count = jobs.len(), "Job list replaced");
        self.state = self.state.with_jobs(jobs);
    }

    /// Wait for the next delivery and apply it. Returns `false` once unmounted.
    pub async fn next_update(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match self.updates.recv().await {
            Some(jobs) => {
                self.apply_delivery(jobs);
                true
            }
            None => false,
        }
    }

    /// Stop polling and stop accepting deliveries
    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            self.updates.close();
            info!("Dashboard unmounted");
        }
    }

    /// Unmount and wait for the polling task to finish
    pub async fn shutdown(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            self.updates.close();
            poller.join().await;
            info!("Dashboard shut down");
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_state_is_loading_and_empty() {
        let state = DashboardState::new();
        assert!(state.is_loading());
        assert_eq!(state.total_jobs(), 0);
        assert!(state.last_updated().is_none());
    }

    #[test]
    fn test_with_jobs_ends_loading_and_keeps_filters() {
        let filters = FilterState::new().with_search("swe");
        let state = DashboardState::new()
            .with_filters(filters.clone())
            .with_jobs(vec![Job::new("Acme", "SWE")]);

        assert!(!state.is_loading());
        assert_eq!(state.filters(), &filters);
        assert_eq!(state.total_jobs(), 1);
    }

    #[test]
    fn test_updates_do_not_touch_previous_snapshot() {
        let first = DashboardState::new().with_jobs(vec![Job::new("Acme", "SWE")]);
        let second = first.with_jobs(Vec::new());
        let third = first.with_filters(FilterState::new().with_remote_only(true));

        assert_eq!(first.total_jobs(), 1);
        assert_eq!(second.total_jobs(), 0);
        assert!(!first.filters().remote_only);
        assert!(third.filters().remote_only);
        assert_eq!(third.jobs(), first.jobs());
    }

    #[test]
    fn test_last_updated_skips_unparseable_dates() {
        let state = DashboardState::new().with_jobs(vec![
            Job::new("A", "x").with_posted_date("2024-05-01T12:00:00Z"),
            Job::new("B", "x").with_posted_date("garbage"),
            Job::new("C", "x").with_posted_date("2024-04-01"),
        ]);

        assert_eq!(
            state.last_updated(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_last_updated_none_without_dates() {
        let state = DashboardState::new().with_jobs(vec![
            Job::new("A", "x").with_posted_date("garbage"),
            Job::new("B", "x"),
        ]);
        assert!(state.last_updated().is_none());
    }

    #[test]
    fn test_filtered_jobs_follow_filters() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let state = DashboardState::new()
            .with_jobs(vec![
                Job::new("Acme", "SWE").with_location("Remote, US"),
                Job::new("Globex", "SWE").with_location("New York, NY"),
            ])
            .with_filters(FilterState::new().with_remote_only(true));

        let filtered = state.filtered_jobs_at(now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].company, "Acme");
        assert_eq!(state.total_jobs(), 2);
    }
}

use anyhow::Result;

pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod filters;
pub mod render;
pub mod table;
pub mod time_utils;
pub mod types;

pub use dashboard::{Dashboard, DashboardState};
pub use feed::{start_polling, FeedClient, JobFeed, PollHandle};
pub use filters::{apply_filters, is_remote, passes, FilterState, PostedWithin};
pub use table::{SortColumn, TableView, TableViewModel};
pub use types::Job;

/// Convenience function for a one-off fetch; failures come back as an empty list
pub async fn fetch_jobs(feed_url: &str) -> Result<Vec<Job>> {
    let client = FeedClient::new(feed_url)?;
    Ok(client.fetch_jobs().await)
}

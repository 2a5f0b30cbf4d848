// src/feed/mod.rs
//! Job feed access: one-shot fetches and the recurring poller

pub mod client;
pub mod poller;

pub use client::{FeedClient, FeedError, FeedSource, JobFeed};
pub use poller::{start_polling, PollHandle, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};

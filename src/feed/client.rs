// src/feed/client.rs
//! Job feed client - fetches the published job list and folds every failure
//! into an empty list

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::types::Job;

const CACHE_BUST_PARAM: &str = "t";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode job list from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the job list lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Http(String),
    File(PathBuf),
}

impl FeedSource {
    /// `http(s)://` URLs are fetched over the network; anything else is a
    /// local path (an optional `file://` prefix is stripped)
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        let lower = url.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSource::Http(url.to_string())
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            FeedSource::File(PathBuf::from(path))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FeedSource::Http(url) => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }
}

/// Anything that can produce a full replacement job list.
///
/// Implementations never fail: an unavailable feed is an empty list.
#[async_trait]
pub trait JobFeed: Send + Sync {
    async fn fetch_jobs(&self) -> Vec<Job>;
}

pub struct FeedClient {
    client: reqwest::Client,
    source: FeedSource,
    last_stamp: AtomicI64,
}

impl FeedClient {
    /// Create a client without a request timeout
    pub fn new(feed_url: &str) -> Result<Self> {
        Self::with_timeout(feed_url, None)
    }

    pub fn with_timeout(feed_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            source: FeedSource::from_url(feed_url),
            last_stamp: AtomicI64::new(0),
        })
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Current epoch milliseconds, bumped so that successive calls never repeat
    fn next_cache_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }

    /// Fetch the job list, surfacing the failure reason
    pub async fn try_fetch_jobs(&self) -> Result<Vec<Job>, FeedError> {
        match &self.source {
            FeedSource::Http(url) => self.fetch_http(url).await,
            FeedSource::File(path) => Self::fetch_file(path).await,
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<Job>, FeedError> {
        let stamp = self.next_cache_stamp();
        debug!(url = %url, t = stamp, "Fetching job feed");

        let response = self
            .client
            .get(url)
            .query(&[(CACHE_BUST_PARAM, stamp)])
            .send()
            .await
            .map_err(|source| FeedError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FeedError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FeedError::Decode {
            origin: url.to_string(),
            source,
        })
    }

    async fn fetch_file(path: &Path) -> Result<Vec<Job>, FeedError> {
        debug!(path = %path.display(), "Reading job feed from disk");

        let content = tokio::fs::read(path).await.map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_slice(&content).map_err(|source| FeedError::Decode {
            origin: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl JobFeed for FeedClient {
    async fn fetch_jobs(&self) -> Vec<Job> {
        match self.try_fetch_jobs().await {
            Ok(jobs) => {
                info!(count = jobs.len(), source = %self.source.describe(), "Fetched jobs");
                jobs
            }
            Err(e) => {
                error!("Failed to fetch jobs: {}", e);
                Vec::new()
            }
        }
    }
}

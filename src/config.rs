// src/config.rs
//! Dashboard configuration: defaults, then an optional TOML file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::table::PageSize;

pub const FEED_URL_ENV: &str = "JOBS_DATA_URL";
pub const CONFIG_PATH_ENV: &str = "JOB_DASHBOARD_CONFIG";

pub const DEFAULT_FEED_URL: &str = "data/jobs.json";
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "/tmp/job-dashboard.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub feed_url: String,
    pub poll_interval: Duration,
    pub page_size: PageSize,
    pub request_timeout: Option<Duration>,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_MINUTES * 60),
            page_size: PageSize::default(),
            request_timeout: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// On-disk shape; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    feed_url: Option<String>,
    poll_interval_minutes: Option<u64>,
    page_size: Option<usize>,
    request_timeout_seconds: Option<u64>,
    log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the config file when one is given, otherwise use defaults.
    ///
    /// `JOB_DASHBOARD_CONFIG` and `JOBS_DATA_URL` reach this layer through the
    /// CLI (`--config` / `--feed-url`), which reads them from the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Invalid TOML")?;
        let defaults = Self::default();

        let poll_interval = match file.poll_interval_minutes {
            Some(0) => anyhow::bail!("poll_interval_minutes must be greater than zero"),
            Some(minutes) => match minutes.checked_mul(60) {
                Some(secs) => Duration::from_secs(secs),
                None => anyhow::bail!("poll_interval_minutes is too large: {}", minutes),
            },
            None => defaults.poll_interval,
        };

        let page_size = match file.page_size {
            Some(size) => PageSize::try_from(size)?,
            None => defaults.page_size,
        };

        let request_timeout = match file.request_timeout_seconds {
            Some(0) => anyhow::bail!("request_timeout_seconds must be greater than zero"),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            feed_url: file.feed_url.unwrap_or(defaults.feed_url),
            poll_interval,
            page_size,
            request_timeout,
            log_file: file.log_file.unwrap_or(defaults.log_file),
        })
    }

    /// Empty or missing overrides keep the current URL
    pub fn with_feed_url_override(mut self, feed_url: Option<String>) -> Self {
        if let Some(url) = feed_url.filter(|url| !url.trim().is_empty()) {
            self.feed_url = url.trim().to_string();
        }
        self
    }
}

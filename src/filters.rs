// src/filters.rs
//! Filter configuration and the per-job predicate.
//!
//! `FilterState` is a plain value: every edit produces a new state and the
//! predicate is a pure function of `(job, filters, now)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::time_utils::is_within_days_at;
use crate::types::Job;

/// Remote detection shared by the filter and the table's Remote column
pub fn is_remote(location: &str) -> bool {
    location.to_lowercase().contains("remote")
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Recency window for the "Posted within" filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PostedWithin {
    #[default]
    All,
    Days7,
    Days14,
    Days30,
    Days60,
}

impl PostedWithin {
    /// Choices in panel order, with their labels
    pub const OPTIONS: [(PostedWithin, &'static str); 5] = [
        (PostedWithin::All, "All (3 months)"),
        (PostedWithin::Days7, "7 days"),
        (PostedWithin::Days14, "14 days"),
        (PostedWithin::Days30, "30 days"),
        (PostedWithin::Days60, "60 days"),
    ];

    pub fn days(self) -> Option<u32> {
        match self {
            PostedWithin::All => None,
            PostedWithin::Days7 => Some(7),
            PostedWithin::Days14 => Some(14),
            PostedWithin::Days30 => Some(30),
            PostedWithin::Days60 => Some(60),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostedWithin::All => "all",
            PostedWithin::Days7 => "7",
            PostedWithin::Days14 => "14",
            PostedWithin::Days30 => "30",
            PostedWithin::Days60 => "60",
        }
    }

    pub fn label(self) -> &'static str {
        Self::OPTIONS
            .iter()
            .find(|(value, _)| *value == self)
            .map(|(_, label)| *label)
            .unwrap_or("All (3 months)")
    }
}

impl fmt::Display for PostedWithin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostedWithin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(PostedWithin::All),
            "7" => Ok(PostedWithin::Days7),
            "14" => Ok(PostedWithin::Days14),
            "30" => Ok(PostedWithin::Days30),
            "60" => Ok(PostedWithin::Days60),
            other => anyhow::bail!(
                "Unsupported posted-within window: {}. Use all, 7, 14, 30 or 60",
                other
            ),
        }
    }
}

impl Serialize for PostedWithin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PostedWithin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User-editable filter configuration.
///
/// `role_categories` and `levels` are carried for the panel but not consulted
/// by [`passes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub role_categories: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub remote_only: bool,
    pub location: String,
    pub posted_within: PostedWithin,
    pub search: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Clear all": back to defaults
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    pub fn with_remote_only(&self, remote_only: bool) -> Self {
        Self {
            remote_only,
            ..self.clone()
        }
    }

    pub fn with_location(&self, location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..self.clone()
        }
    }

    pub fn with_posted_within(&self, posted_within: PostedWithin) -> Self {
        Self {
            posted_within,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self.clone()
        }
    }

    pub fn with_role_categories(&self, role_categories: BTreeSet<String>) -> Self {
        Self {
            role_categories,
            ..self.clone()
        }
    }

    pub fn with_levels(&self, levels: BTreeSet<String>) -> Self {
        Self {
            levels,
            ..self.clone()
        }
    }

    /// True when any clause would exclude something
    pub fn is_active(&self) -> bool {
        self.remote_only
            || !self.location.is_empty()
            || self.posted_within != PostedWithin::All
            || !self.search.is_empty()
    }
}

/// Decide whether `job` survives the active filters, using the wall clock
pub fn passes(job: &Job, filters: &FilterState) -> bool {
    passes_at(job, filters, Utc::now())
}

pub fn passes_at(job: &Job, filters: &FilterState, now: DateTime<Utc>) -> bool {
    if filters.remote_only && !is_remote(&job.location) {
        return false;
    }

    if !filters.location.is_empty()
        && !contains_ignore_case(&job.location, &filters.location.to_lowercase())
    {
        return false;
    }

    if let Some(days) = filters.posted_within.days() {
        if !is_within_days_at(&job.posted_date, days, now) {
            return false;
        }
    }

    if !filters.search.is_empty() {
        let needle = filters.search.to_lowercase();
        if !contains_ignore_case(&job.company, &needle)
            && !contains_ignore_case(&job.title, &needle)
        {
            return false;
        }
    }

    true
}

/// Fresh projection of the jobs that pass, in their original order
pub fn apply_filters(jobs: &[Job], filters: &FilterState) -> Vec<Job> {
    apply_filters_at(jobs, filters, Utc::now())
}

pub fn apply_filters_at(jobs: &[Job], filters: &FilterState, now: DateTime<Utc>) -> Vec<Job> {
    jobs.iter()
        .filter(|job| passes_at(job, filters, now))
        .cloned()
        .collect()
}

/// Distinct role categories present in the feed, sorted
pub fn available_role_categories(jobs: &[Job]) -> Vec<String> {
    distinct(jobs.iter().filter_map(|job| job.role_category.as_deref()))
}

/// Distinct levels present in the feed, sorted
pub fn available_levels(jobs: &[Job]) -> Vec<String> {
    distinct(jobs.iter().filter_map(|job| job.level.as_deref()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

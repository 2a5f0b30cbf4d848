// src/types/job.rs
//! Job posting record as published by the feed

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One posting from the feed. Identity is the company + title + url triple;
/// the feed carries no explicit id.
///
/// Every field tolerates absence and off-type values: older feeds omit
/// `role_category` and `level`, some providers publish `posted_date` as epoch
/// milliseconds, and upstream nulls are common. Scalars become their text,
/// `null` becomes empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub posted_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub provider: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub role_category: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub level: Option<String>,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(value_text(Value::deserialize(deserializer)?))
}

impl Job {
    pub fn new(company: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_posted_date(mut self, posted_date: impl Into<String>) -> Self {
        self.posted_date = posted_date.into();
        self
    }

    pub fn with_role_category(mut self, role_category: impl Into<String>) -> Self {
        self.role_category = Some(role_category.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Role category for display and sorting; empty when the feed omits it
    pub fn role_category_str(&self) -> &str {
        self.role_category.as_deref().unwrap_or("")
    }

    /// Level for display and sorting; empty when the feed omits it
    pub fn level_str(&self) -> &str {
        self.level.as_deref().unwrap_or("")
    }
}

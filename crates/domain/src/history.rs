//! Generation History Domain Model
//!
//! Defines the persisted summary of completed generation requests.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Kind of generation a history record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationType {
    /// Image generated from a text prompt.
    TextToImage,
    /// Image generated from reference images.
    ImageToImage,
    /// Video generation.
    VideoGeneration,
}

impl GenerationType {
    /// Returns all generation types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::TextToImage, Self::ImageToImage, Self::VideoGeneration]
    }

    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextToImage => "text-to-image",
            Self::ImageToImage => "image-to-image",
            Self::VideoGeneration => "video-generation",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TextToImage => "Text to image",
            Self::ImageToImage => "Image to image",
            Self::VideoGeneration => "Video",
        }
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidGenerationType(s.to_string()))
    }
}

/// A history record before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryItem {
    /// Generation kind.
    pub kind: GenerationType,
    /// Prompt used for the request.
    pub prompt: String,
    /// Snapshot of the form values, free of binary content.
    pub params: Value,
    /// Result media URLs in display order.
    pub result_urls: Vec<String>,
    /// Thumbnail URL, defaulting to the first result.
    pub thumbnail_url: Option<String>,
}

impl NewHistoryItem {
    /// Creates a record whose thumbnail is the first result URL.
    #[must_use]
    pub fn new(
        kind: GenerationType,
        prompt: impl Into<String>,
        params: Value,
        result_urls: Vec<String>,
    ) -> Self {
        let thumbnail_url = result_urls.first().cloned();
        Self {
            kind,
            prompt: prompt.into(),
            params,
            result_urls,
            thumbnail_url,
        }
    }
}

/// A persisted generation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unique identifier, never reused.
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Generation kind.
    #[serde(rename = "type")]
    pub kind: GenerationType,
    /// Prompt used for the request.
    #[serde(default)]
    pub prompt: String,
    /// Snapshot of the form values.
    #[serde(default)]
    pub params: Value,
    /// Result media URLs in display order.
    #[serde(default)]
    pub result_urls: Vec<String>,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl HistoryItem {
    /// Completes a new record with its identity.
    #[must_use]
    pub fn from_new(item: NewHistoryItem, id: String, timestamp: i64) -> Self {
        Self {
            id,
            timestamp,
            kind: item.kind,
            prompt: item.prompt,
            params: item.params,
            result_urls: item.result_urls,
            thumbnail_url: item.thumbnail_url,
        }
    }

    /// Returns the creation time, if the timestamp is representable.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Returns the primary result URL.
    #[must_use]
    pub fn primary_url(&self) -> Option<&str> {
        self.result_urls.first().map(String::as_str)
    }

    /// Returns a human-readable "time ago" string relative to `now`.
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let Some(created) = self.created_at() else {
            return "-".to_string();
        };
        let duration = now.signed_duration_since(created);

        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            let mins = duration.num_minutes();
            format!("{mins}m ago")
        } else if duration.num_hours() < 24 {
            let hours = duration.num_hours();
            format!("{hours}h ago")
        } else if duration.num_days() < 7 {
            let days = duration.num_days();
            format!("{days}d ago")
        } else {
            created.format("%Y-%m-%d").to_string()
        }
    }
}

/// Ordered generation history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct GenerationHistory {
    items: Vec<HistoryItem>,
}

impl GenerationHistory {
    /// Inserts an item at the front.
    pub fn prepend(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
    }

    /// Removes every item whose id is in `ids`, returning how many were removed.
    pub fn remove_ids(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        before - self.items.len()
    }

    /// Returns true if an item with this id exists.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Returns an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Consumes the history, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<HistoryItem> {
        self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

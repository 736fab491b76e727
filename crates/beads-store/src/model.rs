//! Record types for the flat-file store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a bead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record in `beads.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bead {
    /// Random UUID (v4).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    /// Lower is more urgent.
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Partial update applied by [`crate::BeadsManager::update`].
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BeadUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<i32>,
    pub labels: Option<Vec<String>>,
}

impl BeadUpdate {
    /// Merge this update into `bead`, leaving `id` and `created_at` alone.
    pub fn apply_to(&self, bead: &mut Bead) {
        if let Some(title) = &self.title {
            bead.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            bead.description.clone_from(description);
        }
        if let Some(status) = self.status {
            bead.status = status;
        }
        if let Some(priority) = self.priority {
            bead.priority = priority;
        }
        if let Some(labels) = &self.labels {
            bead.labels.clone_from(labels);
        }
    }
}

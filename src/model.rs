//! Result records decoded from bd's `--json` output.
//!
//! bd owns these shapes. Only the fields the client routes on are typed;
//! everything else stays in `extra` exactly as bd wrote it, so a decoded
//! record serializes back to the same JSON (offset timestamps and explicit
//! nulls included).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Issue lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Blocked,
    Closed,
    #[serde(untagged)]
    Custom(String),
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Custom(value) => value,
        }
    }

    #[must_use]
    pub const fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue priority (0=highest, 4=backlog).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const CRITICAL: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const LOW: Self = Self(3);
    pub const BACKLOG: Self = Self(4);

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::CRITICAL.0 && self.0 <= Self::BACKLOG.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue type category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Bug,
    Feature,
    #[default]
    Task,
    Epic,
    Chore,
    #[serde(untagged)]
    Custom(String),
}

impl IssueType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Task => "task",
            Self::Epic => "epic",
            Self::Chore => "chore",
            Self::Custom(value) => value,
        }
    }

    #[must_use]
    pub const fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dependency relationship type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Hard blocker.
    #[default]
    Blocks,
    /// Soft link.
    Related,
    /// Epic / subtask.
    ParentChild,
    /// Found while working on the other issue.
    DiscoveredFrom,
    #[serde(untagged)]
    Custom(String),
}

impl DependencyType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blocks => "blocks",
            Self::Related => "related",
            Self::ParentChild => "parent-child",
            Self::DiscoveredFrom => "discovered-from",
            Self::Custom(value) => value,
        }
    }

    #[must_use]
    pub const fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An issue as reported by bd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Issue {
    /// Unique ID (e.g., "bd-a1b2").
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub issue_type: IssueType,

    /// Issues this one depends on (show output only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<LinkedIssue>>,

    /// Issues that depend on this one (show output only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<LinkedIssue>>,

    /// Every other field, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issue {
    /// A string field such as `description`, `notes` or `assignee`.
    /// `None` when bd omitted it or reported `null`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// An RFC 3339 timestamp field (`created_at`, `updated_at`,
    /// `closed_at`), keeping the offset bd reported.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.text(key)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.extra
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| labels.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Blank out nested dependency lists for a lighter listing payload.
    pub fn strip_relations(&mut self) {
        if self.dependencies.is_some() {
            self.dependencies = Some(Vec::new());
        }
        if self.dependents.is_some() {
            self.dependents = Some(Vec::new());
        }
    }
}

/// A dependency or dependent nested inside an [`Issue`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LinkedIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<DependencyType>,

    #[serde(flatten)]
    pub issue: Issue,
}

/// Issue with blocking info (blocked view).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BlockedIssue {
    #[serde(default)]
    pub blocked_by_count: u64,

    #[serde(default)]
    pub blocked_by: Vec<String>,

    #[serde(flatten)]
    pub issue: Issue,
}

/// Aggregate statistics. Counts bd did not report stay absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Stats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_issues: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stats {
    #[must_use]
    pub fn average_lead_time_hours(&self) -> Option<f64> {
        self.extra
            .get("average_lead_time_hours")
            .and_then(Value::as_f64)
    }
}

//! Typed argument sets, one per bd operation.
//!
//! These deserialize straight from MCP tool arguments; unknown keys such as
//! `workspace_root` are ignored here and handled by the dispatch layer.

use serde::Deserialize;

use crate::model::{DependencyType, IssueType, Priority, Status};

/// Default `--limit` for `bd ready`.
pub const DEFAULT_READY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReadyParams {
    pub limit: Option<u32>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub issue_type: Option<IssueType>,
    pub assignee: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowParams {
    pub issue_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateParams {
    pub title: String,
    pub description: Option<String>,
    pub design: Option<String>,
    pub acceptance: Option<String>,
    pub external_ref: Option<String>,
    /// Defaults to P2 when absent.
    pub priority: Option<Priority>,
    /// Defaults to `task` when absent.
    pub issue_type: Option<IssueType>,
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Explicit issue ID instead of a generated one.
    pub id: Option<String>,
    #[serde(default)]
    pub deps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateParams {
    pub issue_id: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub design: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub notes: Option<String>,
    pub external_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CloseParams {
    pub issue_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReopenParams {
    pub issue_ids: Vec<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddDependencyParams {
    pub issue_id: String,
    pub depends_on_id: String,
    #[serde(default)]
    pub dep_type: DependencyType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InitParams {
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RepairDepsParams {
    #[serde(default)]
    pub fix: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DetectPollutionParams {
    #[serde(default)]
    pub clean: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValidateParams {
    /// Comma-separated check names.
    pub checks: Option<String>,
    #[serde(default)]
    pub fix_all: bool,
}

//! Validation of tool arguments before they reach bd.
//!
//! These checks catch malformed requests early with field-level messages.
//! Anything that needs the database (existence, cycles) is left to bd.

use crate::client::params::{
    AddDependencyParams, CloseParams, CreateParams, ListParams, ReadyParams, ReopenParams,
    ShowParams, UpdateParams,
};
use crate::error::{BdError, ValidationError};
use crate::model::{DependencyType, IssueType, Priority, Status};

/// Upper bound accepted for `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Argument sets that can check themselves.
pub trait Validate {
    /// Return every problem found, or `Ok` if the arguments are usable.
    ///
    /// # Errors
    ///
    /// Returns the list of field errors when any rule is violated.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Like [`Validate::validate`], folded into a single [`BdError`].
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `ValidationErrors` when any rule is violated.
    fn check(&self) -> Result<(), BdError> {
        self.validate().map_err(BdError::from_validation_errors)
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_priority(errors: &mut Vec<ValidationError>, priority: Option<Priority>) {
    if priority.is_some_and(|p| !p.is_valid()) {
        errors.push(ValidationError::new("priority", "must be 0-4"));
    }
}

fn check_limit(errors: &mut Vec<ValidationError>, limit: Option<u32>) {
    if limit.is_some_and(|l| l == 0 || l > MAX_LIMIT) {
        errors.push(ValidationError::new(
            "limit",
            format!("must be between 1 and {MAX_LIMIT}"),
        ));
    }
}

fn check_status(errors: &mut Vec<ValidationError>, status: Option<&Status>) {
    if let Some(status) = status.filter(|s| !s.is_standard()) {
        errors.push(ValidationError::new(
            "status",
            format!("unknown status '{status}' (expected open, in_progress, blocked or closed)"),
        ));
    }
}

fn check_issue_type(errors: &mut Vec<ValidationError>, issue_type: Option<&IssueType>) {
    if let Some(issue_type) = issue_type.filter(|t| !t.is_standard()) {
        errors.push(ValidationError::new(
            "issue_type",
            format!("unknown issue type '{issue_type}'"),
        ));
    }
}

fn check_dep_type(errors: &mut Vec<ValidationError>, dep_type: &DependencyType) {
    if !dep_type.is_standard() {
        errors.push(ValidationError::new(
            "dep_type",
            format!("unknown dependency type '{dep_type}'"),
        ));
    }
}

fn check_id(errors: &mut Vec<ValidationError>, field: &str, id: &str) {
    if id.trim().is_empty() {
        errors.push(ValidationError::new(field, "cannot be empty"));
    }
}

impl Validate for ReadyParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_limit(&mut errors, self.limit);
        check_priority(&mut errors, self.priority);
        finish(errors)
    }
}

impl Validate for ListParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_status(&mut errors, self.status.as_ref());
        check_priority(&mut errors, self.priority);
        check_issue_type(&mut errors, self.issue_type.as_ref());
        check_limit(&mut errors, self.limit);
        finish(errors)
    }
}

impl Validate for ShowParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id(&mut errors, "issue_id", &self.issue_id);
        finish(errors)
    }
}

impl Validate for CreateParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        check_priority(&mut errors, self.priority);
        check_issue_type(&mut errors, self.issue_type.as_ref());
        if self.labels.iter().any(|l| l.trim().is_empty()) {
            errors.push(ValidationError::new("labels", "cannot contain empty labels"));
        }
        if self.deps.iter().any(|d| d.trim().is_empty()) {
            errors.push(ValidationError::new("deps", "cannot contain empty IDs"));
        }
        finish(errors)
    }
}

impl Validate for UpdateParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id(&mut errors, "issue_id", &self.issue_id);
        check_status(&mut errors, self.status.as_ref());
        check_priority(&mut errors, self.priority);
        finish(errors)
    }
}

impl Validate for CloseParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id(&mut errors, "issue_id", &self.issue_id);
        finish(errors)
    }
}

impl Validate for ReopenParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.issue_ids.is_empty() {
            errors.push(ValidationError::new("issue_ids", "must name at least one issue"));
        }
        if self.issue_ids.iter().any(|id| id.trim().is_empty()) {
            errors.push(ValidationError::new("issue_ids", "cannot contain empty IDs"));
        }
        finish(errors)
    }
}

impl Validate for AddDependencyParams {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id(&mut errors, "issue_id", &self.issue_id);
        check_id(&mut errors, "depends_on_id", &self.depends_on_id);
        check_dep_type(&mut errors, &self.dep_type);
        if !self.issue_id.is_empty() && self.issue_id == self.depends_on_id {
            errors.push(ValidationError::new(
                "depends_on_id",
                "issue cannot depend on itself",
            ));
        }
        finish(errors)
    }
}

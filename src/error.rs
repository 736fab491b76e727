//! Error types for `beads_mcp`.
//!
//! The taxonomy separates "bd is not installed" ([`BdError::NotFound`]) from
//! "bd rejected the request or returned malformed data" ([`BdError::Command`])
//! and from "the caller has not set a workspace" ([`BdError::Configuration`]).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `beads_mcp` operations.
#[derive(Error, Debug)]
pub enum BdError {
    // === Context Errors ===
    /// A mutating call arrived with no explicit root and no active context.
    #[error("{0}")]
    Configuration(String),

    // === Process Errors ===
    /// The bd executable does not exist at the resolved path.
    #[error("{}", installation_message(path))]
    NotFound { path: PathBuf },

    /// bd exited non-zero, or its output failed decoding or shape checks.
    #[error("{message}")]
    Command {
        message: String,
        stderr: String,
        returncode: i32,
    },

    /// Spawning bd failed for a reason other than a missing executable.
    #[error("Failed to run bd: {0}")]
    Spawn(#[source] std::io::Error),

    // === Validation Errors ===
    /// Tool argument validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {}", join_errors(errors))]
    ValidationErrors { errors: Vec<ValidationError> },

    // === Legacy Store Errors ===
    #[error(transparent)]
    Store(#[from] beads_store::StoreError),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Remediation text shown when the bd executable cannot be spawned.
#[must_use]
pub fn installation_message(attempted: &std::path::Path) -> String {
    format!(
        "bd CLI not found at: {}\n\n\
         The beads MCP server requires the bd CLI to be installed separately.\n\n\
         Install bd CLI:\n  \
         curl -fsSL https://raw.githubusercontent.com/steveyegge/beads/main/install.sh | bash\n\n\
         Or visit: https://github.com/steveyegge/beads#installation\n\n\
         After installation, restart your MCP client to reload the beads server.",
        attempted.display()
    )
}

impl BdError {
    /// A `Command` error with no stderr and returncode 1.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
            stderr: String::new(),
            returncode: 1,
        }
    }

    /// Raised when a single-item lookup decodes to an empty array.
    #[must_use]
    pub fn issue_not_found(id: &str) -> Self {
        Self::command(format!("Issue not found: {id}"))
    }

    /// Raised when decoded JSON has the wrong top-level shape for `operation`.
    #[must_use]
    pub fn invalid_response(operation: &str) -> Self {
        Self::command(format!("Invalid response for {operation}"))
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// Exit code of the failed bd process, if this error came from one.
    #[must_use]
    pub const fn returncode(&self) -> Option<i32> {
        match self {
            Self::Command { returncode, .. } => Some(*returncode),
            _ => None,
        }
    }

    /// Captured stderr of the failed bd process, if any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Command { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type using `BdError`.
pub type Result<T> = std::result::Result<T, BdError>;

//! Workspace context and root resolution.
//!
//! One [`WorkspaceContext`] lives for the whole server process and records
//! which project root (and which `.beads/*.db`) calls without an explicit
//! `workspace_root` should target. It is injected rather than global so tests
//! can build isolated instances.
//!
//! Calls are serialized by the host, so the lock is only there to make the
//! type `Sync`; overlapping writers get last-writer-wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ENV_CONTEXT_SET, ENV_WORKING_DIR, EnvLookup};
use crate::error::{BdError, Result};

/// Conventional directory that holds the bd database.
pub const BEADS_DIR_NAME: &str = ".beads";

/// Conventional database file extension.
pub const DB_EXTENSION: &str = ".db";

/// Point-in-time copy of the context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    pub root: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    /// True once `set` has been called on this context.
    pub context_set: bool,
}

impl ContextSnapshot {
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.context_set
    }
}

/// Process-wide record of the active project root.
#[derive(Debug, Default)]
pub struct WorkspaceContext {
    state: RwLock<ContextSnapshot>,
}

impl WorkspaceContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Normalize `candidate`, make it the active root and cache its database.
    ///
    /// Replaces any previous context. Setting the same path twice yields the
    /// same snapshot.
    pub fn set(&self, candidate: &Path) -> ContextSnapshot {
        let root = resolve_workspace_root(candidate);
        let db_path = find_beads_db(&root);
        info!(
            root = %root.display(),
            db = ?db_path,
            "Workspace context set"
        );

        let snapshot = ContextSnapshot {
            root: Some(root),
            db_path,
            context_set: true,
        };
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        snapshot
    }

    /// True if context was set on this instance or marked in the environment.
    pub fn is_set(&self, env: &impl EnvLookup) -> bool {
        self.snapshot().is_set() || env.var(ENV_CONTEXT_SET).is_some_and(|v| !v.is_empty())
    }

    /// Effective root for a call.
    ///
    /// Precedence: explicit argument, active context, `BEADS_WORKING_DIR`,
    /// then `None` (bd runs in the process's own directory).
    pub fn effective_root(&self, explicit: Option<&str>, env: &impl EnvLookup) -> Option<PathBuf> {
        if let Some(root) = explicit.filter(|r| !r.trim().is_empty()) {
            return Some(PathBuf::from(root));
        }
        if let Some(root) = self.snapshot().root {
            return Some(root);
        }
        env.var(ENV_WORKING_DIR)
            .filter(|r| !r.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Reject a mutating call that has nowhere to go when `require` is on.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `require` is set and no root resolves.
    pub fn ensure_write_context(
        &self,
        explicit: Option<&str>,
        env: &impl EnvLookup,
        require: bool,
    ) -> Result<()> {
        if require && self.effective_root(explicit, env).is_none() {
            return Err(BdError::Configuration(
                "Context not set. Either provide workspace_root parameter or call set_context() first."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Ask git for the repository top level; fall back to an absolute path.
#[must_use]
pub fn resolve_workspace_root(candidate: &Path) -> PathBuf {
    match git_toplevel(candidate) {
        Some(top) => top,
        None => absolute(candidate),
    }
}

fn git_toplevel(candidate: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(candidate)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let top = stdout.trim();
            if top.is_empty() {
                None
            } else {
                Some(PathBuf::from(top))
            }
        }
        Ok(output) => {
            debug!(
                candidate = %candidate.display(),
                code = ?output.status.code(),
                "git rev-parse failed; using absolute path"
            );
            None
        }
        Err(e) => {
            debug!(candidate = %candidate.display(), error = %e, "git unavailable");
            None
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).map_or_else(
        |_| path.to_path_buf(),
        |abs| dunce::simplified(&abs).to_path_buf(),
    )
}

/// Walk upward from `start` looking for `.beads/*.db`.
///
/// Returns the first database found, or `None` after reaching the
/// filesystem root. Unreadable directories are skipped.
#[must_use]
pub fn find_beads_db(start: &Path) -> Option<PathBuf> {
    let start = absolute(start);
    let mut current: &Path = &start;

    loop {
        let beads_dir = current.join(BEADS_DIR_NAME);
        if beads_dir.is_dir() {
            if let Some(db) = first_db_file(&beads_dir) {
                return Some(db);
            }
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}

fn first_db_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(DB_EXTENSION))
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_find_db_in_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        let beads = dir.path().join(".beads");
        fs::create_dir(&beads).unwrap();
        fs::write(beads.join("beads.db"), "").unwrap();

        let found = find_beads_db(dir.path()).unwrap();
        assert_eq!(found, beads.join("beads.db"));
    }

    #[test]
    fn test_find_db_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let beads = dir.path().join(".beads");
        fs::create_dir(&beads).unwrap();
        fs::write(beads.join("project.db"), "").unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_beads_db(&nested), Some(beads.join("project.db")));
    }

    #[test]
    fn test_beads_dir_without_db_keeps_walking() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join(".beads");
        fs::create_dir(&outer).unwrap();
        fs::write(outer.join("outer.db"), "").unwrap();

        let inner_root = dir.path().join("inner");
        fs::create_dir_all(inner_root.join(".beads")).unwrap();
        fs::write(inner_root.join(".beads").join("issues.jsonl"), "").unwrap();

        assert_eq!(find_beads_db(&inner_root), Some(outer.join("outer.db")));
    }

    #[test]
    fn test_find_db_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        fs::create_dir_all(&nested).unwrap();

        // Ancestors of the temp dir are outside our control, so only assert
        // that nothing inside the tree is reported and the walk terminates.
        let found = find_beads_db(&nested);
        assert!(found.is_none_or(|p| !p.starts_with(dir.path())));
    }

    #[test]
    fn test_effective_root_precedence() {
        let ctx = WorkspaceContext::new();
        let env = |key: &str| (key == ENV_WORKING_DIR).then(|| "/from/env".to_string());

        assert_eq!(
            ctx.effective_root(Some("/explicit"), &env),
            Some(PathBuf::from("/explicit"))
        );
        assert_eq!(ctx.effective_root(None, &env), Some(PathBuf::from("/from/env")));
        assert_eq!(
            ctx.effective_root(Some("   "), &env),
            Some(PathBuf::from("/from/env"))
        );
        assert_eq!(ctx.effective_root(None, &no_env), None);

        let dir = tempfile::tempdir().unwrap();
        let snapshot = ctx.set(dir.path());
        assert_eq!(ctx.effective_root(None, &env), snapshot.root);
        assert_eq!(
            ctx.effective_root(Some("/explicit"), &env),
            Some(PathBuf::from("/explicit"))
        );
    }

    #[test]
    fn test_set_caches_db_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let beads = dir.path().join(".beads");
        fs::create_dir(&beads).unwrap();
        fs::write(beads.join("beads.db"), "").unwrap();

        let ctx = WorkspaceContext::new();
        assert!(!ctx.is_set(&no_env));
        let first = ctx.set(dir.path());
        let second = ctx.set(dir.path());

        assert_eq!(first, second);
        assert!(first.context_set);
        assert!(ctx.is_set(&no_env));
        assert!(first.db_path.is_some_and(|p| p.ends_with(".beads/beads.db")));
    }

    #[test]
    fn test_context_set_marker_from_env() {
        let ctx = WorkspaceContext::new();
        let env = |key: &str| (key == ENV_CONTEXT_SET).then(|| "1".to_string());
        assert!(ctx.is_set(&env));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_nonexistent_path_falls_back_to_absolute() {
        let ctx = WorkspaceContext::new();
        let snapshot = ctx.set(Path::new("/definitely/not/a/real/dir"));
        assert_eq!(snapshot.root, Some(PathBuf::from("/definitely/not/a/real/dir")));
        assert!(snapshot.db_path.is_none());
    }

    #[test]
    fn test_require_context_gate() {
        let ctx = WorkspaceContext::new();

        let err = ctx.ensure_write_context(None, &no_env, true).unwrap_err();
        assert!(matches!(err, BdError::Configuration(_)));
        assert!(err.to_string().contains("set_context"));

        assert!(ctx.ensure_write_context(None, &no_env, false).is_ok());
        assert!(ctx.ensure_write_context(Some("/repo"), &no_env, true).is_ok());
    }
}

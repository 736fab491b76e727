//! Configuration management for `beads_mcp`.
//!
//! Configuration is derived from environment variables only:
//! - `BEADS_PATH` or a `PATH` search or `~/.local/bin/bd` for the executable
//! - `BEADS_DIR` / `BEADS_DB` for an explicit database location
//! - `BEADS_ACTOR` (falling back to the OS user) for the actor flag
//! - `BEADS_NO_AUTO_FLUSH` / `BEADS_NO_AUTO_IMPORT` suppression flags
//! - `BEADS_WORKING_DIR` for the default working directory
//!
//! A [`BeadsConfig`] is rebuilt from the environment every time a client is
//! constructed and never cached.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::context::ContextSnapshot;

pub const ENV_PATH: &str = "BEADS_PATH";
pub const ENV_DIR: &str = "BEADS_DIR";
pub const ENV_DB: &str = "BEADS_DB";
pub const ENV_ACTOR: &str = "BEADS_ACTOR";
pub const ENV_NO_AUTO_FLUSH: &str = "BEADS_NO_AUTO_FLUSH";
pub const ENV_NO_AUTO_IMPORT: &str = "BEADS_NO_AUTO_IMPORT";
pub const ENV_WORKING_DIR: &str = "BEADS_WORKING_DIR";
pub const ENV_REQUIRE_CONTEXT: &str = "BEADS_REQUIRE_CONTEXT";
pub const ENV_CONTEXT_SET: &str = "BEADS_CONTEXT_SET";

/// Name of the external executable.
pub const BD_EXECUTABLE: &str = "bd";

/// Source of environment variables.
///
/// The process environment in production, a map in tests.
pub trait EnvLookup {
    fn var(&self, key: &str) -> Option<String>;

    /// Every visible variable. Sources that cannot enumerate return nothing.
    fn vars(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Look up `key`, treating an empty value as unset.
fn non_empty(env: &impl EnvLookup, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.is_empty())
}

/// Parse a boolean flag: true only for `1`, `true` or `yes` (any case).
#[must_use]
pub fn parse_bool_env(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Resolved settings for invoking bd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct BeadsConfig {
    /// Path of the bd executable (best guess; may not exist).
    pub beads_path: PathBuf,
    /// Explicit `.beads` directory, exported as `BEADS_DIR`.
    pub beads_dir: Option<PathBuf>,
    /// Explicit database file, exported as `BEADS_DB`.
    pub beads_db: Option<PathBuf>,
    /// Value for `--actor`.
    pub actor: Option<String>,
    pub no_auto_flush: bool,
    pub no_auto_import: bool,
    /// Default working directory when a call names no root.
    pub working_dir: Option<PathBuf>,
    /// Reject mutating calls that have no root.
    pub require_context: bool,
}

impl BeadsConfig {
    /// Build a config from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&ProcessEnv)
    }

    /// Build a config from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(env: &impl EnvLookup) -> Self {
        Self {
            beads_path: resolve_beads_path(env),
            beads_dir: non_empty(env, ENV_DIR).map(PathBuf::from),
            beads_db: non_empty(env, ENV_DB).map(PathBuf::from),
            actor: non_empty(env, ENV_ACTOR)
                .or_else(|| non_empty(env, "USER"))
                .or_else(|| non_empty(env, "USERNAME")),
            no_auto_flush: parse_bool_env(env.var(ENV_NO_AUTO_FLUSH).as_deref()),
            no_auto_import: parse_bool_env(env.var(ENV_NO_AUTO_IMPORT).as_deref()),
            working_dir: non_empty(env, ENV_WORKING_DIR).map(PathBuf::from),
            require_context: parse_bool_env(env.var(ENV_REQUIRE_CONTEXT).as_deref()),
        }
    }

    /// Overlay an explicitly set workspace context.
    ///
    /// Once context is set its database path replaces any `BEADS_DB` taken
    /// from the environment, including clearing it when no database was found.
    #[must_use]
    pub fn with_context(mut self, snapshot: &ContextSnapshot) -> Self {
        if snapshot.is_set() {
            self.beads_db.clone_from(&snapshot.db_path);
            if snapshot.root.is_some() {
                self.working_dir.clone_from(&snapshot.root);
            }
        }
        self
    }

    /// Flags shared by every JSON-mode command: actor and auto-sync suppression.
    #[must_use]
    pub fn global_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(actor) = &self.actor {
            flags.push("--actor".to_string());
            flags.push(actor.clone());
        }
        if self.no_auto_flush {
            flags.push("--no-auto-flush".to_string());
        }
        if self.no_auto_import {
            flags.push("--no-auto-import".to_string());
        }
        flags
    }

    /// The single environment override passed to bd, if any.
    ///
    /// `BEADS_DIR` wins over `BEADS_DB`; never both.
    #[must_use]
    pub fn env_overlay(&self) -> Option<(&'static str, &Path)> {
        self.beads_dir
            .as_deref()
            .map(|dir| (ENV_DIR, dir))
            .or_else(|| self.beads_db.as_deref().map(|db| (ENV_DB, db)))
    }
}

/// Resolve the bd executable: `BEADS_PATH`, then `PATH`, then `~/.local/bin/bd`.
#[must_use]
pub fn resolve_beads_path(env: &impl EnvLookup) -> PathBuf {
    if let Some(explicit) = env.var(ENV_PATH).filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(explicit);
    }

    if let Some(found) = find_in_path(BD_EXECUTABLE, env.var("PATH").map(OsString::from)) {
        return found;
    }

    fallback_beads_path()
}

/// Common install location used by the bd installer.
#[must_use]
pub fn fallback_beads_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".local")
        .join("bin")
        .join(BD_EXECUTABLE)
}

/// Scan each `PATH` entry for a regular file named `executable`.
///
/// On Windows a `<name>.exe` sibling is probed too.
#[must_use]
pub fn find_in_path(executable: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    for dir in std::env::split_paths(&path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(executable);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{executable}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

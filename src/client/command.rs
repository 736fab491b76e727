//! Argument-vector builders, one per bd operation.
//!
//! Builders are pure: they never look at the environment. Global flags
//! (`--actor`, `--no-auto-flush`, `--no-auto-import`) are attached later by
//! [`CommandSpec::argv`], and only for JSON commands plus the two text
//! commands that opt in (`dep add`, `init`). bd's grammar depends on that
//! asymmetry, so it is kept exactly.

use crate::client::params::{
    AddDependencyParams, CloseParams, CreateParams, DEFAULT_READY_LIMIT, DetectPollutionParams,
    InitParams, ListParams, ReadyParams, ReopenParams, RepairDepsParams, ShowParams,
    UpdateParams, ValidateParams,
};
use crate::model::{IssueType, Priority};

/// How bd's stdout is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `--json` is appended and stdout is parsed.
    Json,
    /// stdout is returned verbatim.
    Text { global_flags: bool },
}

/// A built bd command before global flags are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Operation name used in error messages and logs.
    pub operation: &'static str,
    pub args: Vec<String>,
    pub mode: OutputMode,
}

impl CommandSpec {
    fn json(operation: &'static str, args: Vec<String>) -> Self {
        Self {
            operation,
            args,
            mode: OutputMode::Json,
        }
    }

    fn text(operation: &'static str, args: Vec<String>, global_flags: bool) -> Self {
        Self {
            operation,
            args,
            mode: OutputMode::Text { global_flags },
        }
    }

    /// Final argument vector: `<args> [global flags] [--json]`.
    #[must_use]
    pub fn argv(&self, global_flags: &[String]) -> Vec<String> {
        let mut argv = self.args.clone();
        match self.mode {
            OutputMode::Json => {
                argv.extend_from_slice(global_flags);
                argv.push("--json".to_string());
            }
            OutputMode::Text { global_flags: true } => argv.extend_from_slice(global_flags),
            OutputMode::Text { global_flags: false } => {}
        }
        argv
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// Append `flag value` when `value` is present and non-empty.
fn push_opt(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_priority(args: &mut Vec<String>, priority: Option<Priority>) {
    if let Some(priority) = priority {
        args.push("--priority".to_string());
        args.push(priority.0.to_string());
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, on: bool) {
    if on {
        args.push(flag.to_string());
    }
}

#[must_use]
pub fn ready(params: &ReadyParams) -> CommandSpec {
    let limit = params.limit.unwrap_or(DEFAULT_READY_LIMIT);
    let mut argv = args(&["ready", "--limit"]);
    argv.push(limit.to_string());
    push_priority(&mut argv, params.priority);
    push_opt(&mut argv, "--assignee", params.assignee.as_deref());
    CommandSpec::json("ready", argv)
}

#[must_use]
pub fn list(params: &ListParams) -> CommandSpec {
    let mut argv = args(&["list"]);
    push_opt(&mut argv, "--status", params.status.as_ref().map(|s| s.as_str()));
    push_priority(&mut argv, params.priority);
    push_opt(&mut argv, "--type", params.issue_type.as_ref().map(|t| t.as_str()));
    push_opt(&mut argv, "--assignee", params.assignee.as_deref());
    if let Some(limit) = params.limit {
        argv.push("--limit".to_string());
        argv.push(limit.to_string());
    }
    CommandSpec::json("list", argv)
}

#[must_use]
pub fn show(params: &ShowParams) -> CommandSpec {
    CommandSpec::json("show", args(&["show", &params.issue_id]))
}

#[must_use]
pub fn create(params: &CreateParams) -> CommandSpec {
    let priority = params.priority.unwrap_or(Priority::MEDIUM);
    let issue_type = params.issue_type.clone().unwrap_or(IssueType::Task);

    let mut argv = args(&["create", &params.title, "-p"]);
    argv.push(priority.0.to_string());
    argv.push("-t".to_string());
    argv.push(issue_type.as_str().to_string());

    push_opt(&mut argv, "-d", params.description.as_deref());
    push_opt(&mut argv, "--design", params.design.as_deref());
    push_opt(&mut argv, "--acceptance", params.acceptance.as_deref());
    push_opt(&mut argv, "--external-ref", params.external_ref.as_deref());
    push_opt(&mut argv, "--assignee", params.assignee.as_deref());
    push_opt(&mut argv, "--id", params.id.as_deref());
    for label in &params.labels {
        argv.push("-l".to_string());
        argv.push(label.clone());
    }
    if !params.deps.is_empty() {
        argv.push("--deps".to_string());
        argv.push(params.deps.join(","));
    }
    CommandSpec::json("create", argv)
}

#[must_use]
pub fn update(params: &UpdateParams) -> CommandSpec {
    let mut argv = args(&["update", &params.issue_id]);
    push_opt(&mut argv, "--status", params.status.as_ref().map(|s| s.as_str()));
    push_priority(&mut argv, params.priority);
    push_opt(&mut argv, "--assignee", params.assignee.as_deref());
    push_opt(&mut argv, "--title", params.title.as_deref());
    push_opt(&mut argv, "--description", params.description.as_deref());
    push_opt(&mut argv, "--design", params.design.as_deref());
    push_opt(&mut argv, "--acceptance", params.acceptance_criteria.as_deref());
    push_opt(&mut argv, "--notes", params.notes.as_deref());
    push_opt(&mut argv, "--external-ref", params.external_ref.as_deref());
    CommandSpec::json("update", argv)
}

#[must_use]
pub fn close(params: &CloseParams) -> CommandSpec {
    CommandSpec::json(
        "close",
        args(&["close", &params.issue_id, "--reason", &params.reason]),
    )
}

#[must_use]
pub fn reopen(params: &ReopenParams) -> CommandSpec {
    let mut argv = args(&["reopen"]);
    argv.extend(params.issue_ids.iter().cloned());
    push_opt(&mut argv, "--reason", params.reason.as_deref());
    CommandSpec::json("reopen", argv)
}

#[must_use]
pub fn add_dependency(params: &AddDependencyParams) -> CommandSpec {
    CommandSpec::text(
        "dep add",
        args(&[
            "dep",
            "add",
            &params.issue_id,
            &params.depends_on_id,
            "--type",
            params.dep_type.as_str(),
        ]),
        true,
    )
}

#[must_use]
pub fn init(params: &InitParams) -> CommandSpec {
    let mut argv = args(&["init"]);
    push_opt(&mut argv, "--prefix", params.prefix.as_deref());
    CommandSpec::text("init", argv, true)
}

#[must_use]
pub fn quickstart() -> CommandSpec {
    CommandSpec::text("quickstart", args(&["quickstart"]), false)
}

#[must_use]
pub fn stats() -> CommandSpec {
    CommandSpec::json("stats", args(&["stats"]))
}

#[must_use]
pub fn blocked() -> CommandSpec {
    CommandSpec::json("blocked", args(&["blocked"]))
}

#[must_use]
pub fn inspect_migration() -> CommandSpec {
    CommandSpec::json("inspect-migration", args(&["inspect-migration"]))
}

#[must_use]
pub fn schema_info() -> CommandSpec {
    CommandSpec::json("get-schema-info", args(&["get-schema-info"]))
}

#[must_use]
pub fn repair_deps(params: RepairDepsParams) -> CommandSpec {
    let mut argv = args(&["repair-deps"]);
    push_flag(&mut argv, "--fix", params.fix);
    CommandSpec::json("repair-deps", argv)
}

#[must_use]
pub fn detect_pollution(params: DetectPollutionParams) -> CommandSpec {
    let mut argv = args(&["detect-pollution"]);
    if params.clean {
        argv.push("--clean".to_string());
        argv.push("--yes".to_string());
    }
    CommandSpec::json("detect-pollution", argv)
}

#[must_use]
pub fn validate(params: &ValidateParams) -> CommandSpec {
    let mut argv = args(&["validate"]);
    let checks = params.checks.as_deref().filter(|c| !c.trim().is_empty());
    push_opt(&mut argv, "--checks", checks);
    push_flag(&mut argv, "--fix-all", params.fix_all);
    CommandSpec::json("validate", argv)
}

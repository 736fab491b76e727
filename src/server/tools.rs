//! Tool catalog advertised through `tools/list`.

use serde_json::{Value, json};

use super::protocol::Tool;

const STATUSES: [&str; 4] = ["open", "in_progress", "blocked", "closed"];
const ISSUE_TYPES: [&str; 5] = ["bug", "feature", "task", "epic", "chore"];
const DEP_TYPES: [&str; 4] = ["blocks", "related", "parent-child", "discovered-from"];

fn workspace_root() -> Value {
    json!({
        "type": "string",
        "description": "Workspace root; defaults to the active context"
    })
}

fn priority() -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "maximum": 4,
        "description": "Priority (0-4, 0=highest)"
    })
}

fn limit() -> Value {
    json!({"type": "integer", "minimum": 1, "maximum": 100})
}

fn string() -> Value {
    json!({"type": "string"})
}

fn boolean() -> Value {
    json!({"type": "boolean"})
}

fn string_array() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

/// Build an object schema; `workspace_root` is always accepted.
fn schema(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let mut props = serde_json::Map::new();
    for (name, prop) in properties {
        props.insert((*name).to_string(), prop.clone());
    }
    props
        .entry("workspace_root")
        .or_insert_with(workspace_root);

    let mut schema = json!({"type": "object", "properties": props});
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// Every tool this server exposes, in a stable order.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        Tool {
            name: "set_context",
            title: "Set beads workspace context",
            description: "Set the workspace root directory for all bd operations. Call this first for multi-repo setups.",
            input_schema: schema(
                &[(
                    "workspace_root",
                    json!({
                        "type": "string",
                        "description": "Absolute path to workspace/project root directory"
                    }),
                )],
                &["workspace_root"],
            ),
        },
        Tool {
            name: "where_am_i",
            title: "Show beads workspace context",
            description: "Show current workspace context and database path.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "ready",
            title: "Find ready work",
            description: "Find tasks that have no blockers and are ready to be worked on.",
            input_schema: schema(
                &[
                    ("limit", limit()),
                    ("priority", priority()),
                    ("assignee", string()),
                ],
                &[],
            ),
        },
        Tool {
            name: "list",
            title: "List issues",
            description: "List all issues with optional filters (status, priority, type, assignee).",
            input_schema: schema(
                &[
                    ("status", json!({"type": "string", "enum": STATUSES})),
                    ("priority", priority()),
                    ("issue_type", json!({"type": "string", "enum": ISSUE_TYPES})),
                    ("assignee", string()),
                    ("limit", limit()),
                ],
                &[],
            ),
        },
        Tool {
            name: "show",
            title: "Show issue details",
            description: "Show detailed information about a specific issue including dependencies.",
            input_schema: schema(
                &[(
                    "issue_id",
                    json!({"type": "string", "description": "Issue ID (e.g., bd-1)"}),
                )],
                &["issue_id"],
            ),
        },
        Tool {
            name: "create",
            title: "Create issue",
            description: "Create a new issue (bug, feature, task, epic, or chore) with optional design and dependencies.",
            input_schema: schema(
                &[
                    ("title", string()),
                    ("description", string()),
                    ("design", string()),
                    ("acceptance", string()),
                    ("external_ref", string()),
                    ("priority", priority()),
                    ("issue_type", json!({"type": "string", "enum": ISSUE_TYPES})),
                    ("assignee", string()),
                    ("labels", string_array()),
                    ("id", string()),
                    ("deps", string_array()),
                ],
                &["title"],
            ),
        },
        Tool {
            name: "update",
            title: "Update issue",
            description: "Update an existing issue (status, priority, design, notes, etc). Status 'closed'/'open' routes to close/reopen.",
            input_schema: schema(
                &[
                    ("issue_id", string()),
                    ("status", json!({"type": "string", "enum": STATUSES})),
                    ("priority", priority()),
                    ("assignee", string()),
                    ("title", string()),
                    ("description", string()),
                    ("design", string()),
                    ("acceptance_criteria", string()),
                    ("notes", string()),
                    ("external_ref", string()),
                ],
                &["issue_id"],
            ),
        },
        Tool {
            name: "close",
            title: "Close issue",
            description: "Close (complete) an issue.",
            input_schema: schema(&[("issue_id", string()), ("reason", string())], &["issue_id"]),
        },
        Tool {
            name: "reopen",
            title: "Reopen issues",
            description: "Reopen one or more closed issues.",
            input_schema: schema(
                &[
                    ("issue_ids", json!({"type": "array", "items": {"type": "string"}, "minItems": 1})),
                    ("reason", string()),
                ],
                &["issue_ids"],
            ),
        },
        Tool {
            name: "dep",
            title: "Add dependency",
            description: "Add a dependency between issues. Types: blocks (hard blocker), related (soft link), parent-child (epic/subtask), discovered-from (found during work).",
            input_schema: schema(
                &[
                    ("issue_id", string()),
                    ("depends_on_id", string()),
                    ("dep_type", json!({"type": "string", "enum": DEP_TYPES})),
                ],
                &["issue_id", "depends_on_id"],
            ),
        },
        Tool {
            name: "stats",
            title: "Project statistics",
            description: "Get statistics: total issues, open, in_progress, closed, blocked, ready, and average lead time.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "blocked",
            title: "Blocked issues",
            description: "Get blocked issues showing what dependencies are blocking them from being worked on.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "init",
            title: "Initialize beads",
            description: "Initialize bd in current directory. Creates .beads/ directory and database with optional custom prefix for issue IDs.",
            input_schema: schema(&[("prefix", string())], &[]),
        },
        Tool {
            name: "debug_env",
            title: "Debug environment",
            description: "Debug tool: Show environment and working directory information.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "inspect_migration",
            title: "Inspect migration plan",
            description: "Get migration plan and database state for agent analysis.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "get_schema_info",
            title: "Get schema info",
            description: "Get current database schema for inspection.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "repair_deps",
            title: "Repair dependencies",
            description: "Find and optionally fix orphaned dependency references.",
            input_schema: schema(&[("fix", boolean())], &[]),
        },
        Tool {
            name: "detect_pollution",
            title: "Detect test pollution",
            description: "Detect test issues that leaked into production database.",
            input_schema: schema(&[("clean", boolean())], &[]),
        },
        Tool {
            name: "validate",
            title: "Validate database",
            description: "Run comprehensive database health checks (orphans, duplicates, pollution, conflicts).",
            input_schema: schema(&[("checks", string()), ("fix_all", boolean())], &[]),
        },
        Tool {
            name: "beads_init",
            title: "Initialize flat-file beads",
            description: "Create .beads/beads.jsonl in the workspace for the built-in flat-file tracker.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "beads_list",
            title: "List flat-file beads",
            description: "List every bead in the workspace's .beads/beads.jsonl.",
            input_schema: schema(&[], &[]),
        },
        Tool {
            name: "beads_add",
            title: "Add flat-file bead",
            description: "Append a new open bead to .beads/beads.jsonl.",
            input_schema: schema(
                &[
                    ("title", string()),
                    ("description", string()),
                    ("priority", json!({"type": "integer"})),
                ],
                &["title"],
            ),
        },
        Tool {
            name: "beads_update",
            title: "Update flat-file bead",
            description: "Update fields of a bead in .beads/beads.jsonl.",
            input_schema: schema(
                &[
                    ("id", string()),
                    ("title", string()),
                    ("description", string()),
                    ("status", json!({"type": "string", "enum": ["open", "in_progress", "closed"]})),
                    ("priority", json!({"type": "integer"})),
                    ("labels", string_array()),
                ],
                &["id"],
            ),
        },
    ]
}

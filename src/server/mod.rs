//! MCP server over stdio.
//!
//! Requests are newline-delimited JSON-RPC 2.0 messages on stdin; responses
//! go to stdout one per line. Calls run strictly one at a time, each building
//! a fresh [`BdClient`] from the environment plus the active workspace
//! context.

pub mod protocol;
pub mod tools;

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use beads_store::{BeadUpdate, BeadsManager};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::client::{
    AddDependencyParams, BdClient, CloseParams, CommandRunner, CreateParams,
    DetectPollutionParams, InitParams, ListParams, ProcessRunner, ReadyParams, ReopenParams,
    RepairDepsParams, ShowParams, UpdateParams, ValidateParams,
};
use crate::config::{
    BeadsConfig, ENV_ACTOR, ENV_DB, ENV_PATH, ENV_WORKING_DIR, EnvLookup, ProcessEnv,
};
use crate::context::WorkspaceContext;
use crate::error::{BdError, Result};
use crate::model::{Issue, Status};
use crate::validation::Validate;
use protocol::{
    CallToolParams, INTERNAL_ERROR, JsonRpcError, JsonRpcRequest, JsonRpcResponse, PARSE_ERROR,
    PROTOCOL_VERSION, ReadResourceParams, SERVER_NAME, SERVER_VERSION, ToolResult,
};

/// URI of the quickstart resource.
pub const QUICKSTART_URI: &str = "beads://quickstart";

const NOT_SET: &str = "NOT SET";
const DEFAULT_CLOSE_REASON: &str = "Completed";
const DEFAULT_REOPEN_REASON: &str = "Reopened";
const DEFAULT_BEAD_PRIORITY: i32 = 1;

#[derive(Debug, Deserialize)]
struct SetContextArgs {
    workspace_root: String,
}

#[derive(Debug, Deserialize)]
struct CloseArgs {
    issue_id: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BeadAddArgs {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_bead_priority")]
    priority: i32,
}

const fn default_bead_priority() -> i32 {
    DEFAULT_BEAD_PRIORITY
}

#[derive(Debug, Deserialize)]
struct BeadUpdateArgs {
    id: String,
    #[serde(flatten)]
    update: BeadUpdate,
}

/// Deserialize tool arguments, reporting shape problems as validation errors.
fn parse<T: DeserializeOwned>(args: &Value) -> Result<T> {
    serde_json::from_value(args.clone())
        .map_err(|err| BdError::validation("arguments", err.to_string()))
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn display_or_not_set(path: Option<&Path>) -> String {
    path.map_or_else(|| NOT_SET.to_string(), |p| p.display().to_string())
}

/// The MCP server: workspace context plus the seams used to reach bd.
#[derive(Debug, Default)]
pub struct McpServer<R = ProcessRunner, E = ProcessEnv> {
    context: WorkspaceContext,
    runner: R,
    env: E,
}

impl McpServer {
    /// Server that spawns real bd processes and reads the real environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(ProcessRunner, ProcessEnv)
    }
}

impl<R: CommandRunner, E: EnvLookup> McpServer<R, E> {
    pub fn with_parts(runner: R, env: E) -> Self {
        Self {
            context: WorkspaceContext::new(),
            runner,
            env,
        }
    }

    pub const fn context(&self) -> &WorkspaceContext {
        &self.context
    }

    /// Serve stdin/stdout until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails.
    pub fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve newline-delimited JSON-RPC from `input`, replying on `output`.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn serve(&self, mut input: impl BufRead, mut output: impl Write) -> Result<()> {
        info!(version = SERVER_VERSION, "beads-mcp listening on stdio");
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Invalid UTF-8 becomes U+FFFD and fails JSON parsing with -32700.
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_message(line) {
                serde_json::to_writer(&mut output, &response)?;
                output.write_all(b"\n")?;
                output.flush()?;
            }
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {err}")),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification");
            return None;
        };

        Some(match self.handle_request(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_request(&self, method: &str, params: Value) -> std::result::Result<Value, JsonRpcError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}, "resources": {}},
                "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION}
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({"tools": tools::catalog()})),
            "tools/call" => self.handle_tools_call(params),
            "resources/list" => Ok(json!({
                "resources": [{
                    "uri": QUICKSTART_URI,
                    "name": "beads_quickstart",
                    "title": "Beads Quickstart Guide",
                    "description": "Quickstart guide for using beads (bd) CLI.",
                    "mimeType": "text/plain"
                }]
            })),
            "resources/read" => self.handle_resources_read(params),
            _ => Err(JsonRpcError::method_not_found(method)),
        }
    }

    fn handle_tools_call(&self, params: Value) -> std::result::Result<Value, JsonRpcError> {
        let call: CallToolParams = serde_json::from_value(params)
            .map_err(|err| JsonRpcError::invalid_params(format!("Invalid tools/call params: {err}")))?;
        if !tools::catalog().iter().any(|tool| tool.name == call.name) {
            return Err(JsonRpcError::invalid_params(format!("Unknown tool: {}", call.name)));
        }

        let args = call.arguments.unwrap_or_else(|| json!({}));
        debug!(tool = %call.name, "Tool call");
        let result = match self.call_tool(&call.name, &args) {
            Ok(text) => ToolResult::text(text),
            Err(err) => {
                warn!(tool = %call.name, error = %err, "Tool call failed");
                ToolResult::error(err.to_string())
            }
        };
        serde_json::to_value(result).map_err(|err| JsonRpcError::new(INTERNAL_ERROR, err.to_string()))
    }

    fn handle_resources_read(&self, params: Value) -> std::result::Result<Value, JsonRpcError> {
        let read: ReadResourceParams = serde_json::from_value(params)
            .map_err(|err| JsonRpcError::invalid_params(format!("Invalid resources/read params: {err}")))?;
        if read.uri != QUICKSTART_URI {
            return Err(JsonRpcError::invalid_params(format!("Unknown resource: {}", read.uri)));
        }
        let text = self
            .client(None)
            .quickstart()
            .map_err(|err| JsonRpcError::new(INTERNAL_ERROR, err.to_string()))?;
        Ok(json!({
            "contents": [{"uri": QUICKSTART_URI, "mimeType": "text/plain", "text": text}]
        }))
    }

    fn config(&self) -> BeadsConfig {
        BeadsConfig::from_lookup(&self.env).with_context(&self.context.snapshot())
    }

    fn client(&self, workspace_root: Option<&str>) -> BdClient<&R> {
        let root = self.context.effective_root(workspace_root, &self.env);
        BdClient::with_runner(self.config(), root, &self.runner)
    }

    /// Client for a mutating call, after the require-context gate.
    fn write_client(&self, workspace_root: Option<&str>) -> Result<BdClient<&R>> {
        let config = self.config();
        self.context
            .ensure_write_context(workspace_root, &self.env, config.require_context)?;
        let root = self.context.effective_root(workspace_root, &self.env);
        Ok(BdClient::with_runner(config, root, &self.runner))
    }

    fn store(&self, workspace_root: Option<&str>) -> Result<BeadsManager> {
        let root = match self.context.effective_root(workspace_root, &self.env) {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        Ok(BeadsManager::new(root))
    }

    /// Run one tool and return its text payload.
    fn call_tool(&self, name: &str, args: &Value) -> Result<String> {
        let root = args.get("workspace_root").and_then(Value::as_str);
        match name {
            "set_context" => self.set_context(parse(args)?),
            "where_am_i" => Ok(self.where_am_i()),
            "debug_env" => Ok(self.debug_env()),
            "ready" => {
                let params: ReadyParams = parse(args)?;
                params.check()?;
                let mut issues = self.client(root).ready(&params)?;
                issues.iter_mut().for_each(Issue::strip_relations);
                render(&issues)
            }
            "list" => {
                let params: ListParams = parse(args)?;
                params.check()?;
                let mut issues = self.client(root).list_issues(&params)?;
                issues.iter_mut().for_each(Issue::strip_relations);
                render(&issues)
            }
            "show" => {
                let params: ShowParams = parse(args)?;
                params.check()?;
                render(&self.client(root).show(&params)?)
            }
            "create" => {
                let params: CreateParams = parse(args)?;
                params.check()?;
                render(&self.write_client(root)?.create(&params)?)
            }
            "update" => self.update(root, parse(args)?),
            "close" => {
                let args: CloseArgs = parse(args)?;
                let params = CloseParams {
                    reason: non_empty(args.reason.as_deref())
                        .unwrap_or(DEFAULT_CLOSE_REASON)
                        .to_string(),
                    issue_id: args.issue_id,
                };
                params.check()?;
                render(&self.write_client(root)?.close(&params)?)
            }
            "reopen" => {
                let params: ReopenParams = parse(args)?;
                params.check()?;
                render(&self.write_client(root)?.reopen(&params)?)
            }
            "dep" => self.add_dependency(root, parse(args)?),
            "stats" => render(&self.client(root).stats()?),
            "blocked" => render(&self.client(root).blocked()?),
            "init" => {
                let params: InitParams = parse(args)?;
                self.write_client(root)?.init(&params)
            }
            "inspect_migration" => render(&self.client(root).inspect_migration()?),
            "get_schema_info" => render(&self.client(root).schema_info()?),
            "repair_deps" => {
                let params: RepairDepsParams = parse(args)?;
                render(&self.client(root).repair_deps(params)?)
            }
            "detect_pollution" => {
                let params: DetectPollutionParams = parse(args)?;
                render(&self.client(root).detect_pollution(params)?)
            }
            "validate" => {
                let params: ValidateParams = parse(args)?;
                render(&self.client(root).validate(&params)?)
            }
            "beads_init" => Ok(self.store(root)?.init()?),
            "beads_list" => render(&self.store(root)?.get_all()?),
            "beads_add" => {
                let args: BeadAddArgs = parse(args)?;
                render(&self.store(root)?.add(&args.title, &args.description, args.priority)?)
            }
            "beads_update" => {
                let args: BeadUpdateArgs = parse(args)?;
                match self.store(root)?.update(&args.id, &args.update)? {
                    Some(bead) => render(&bead),
                    None => Err(BdError::command(format!("Bead not found: {}", args.id))),
                }
            }
            other => Err(BdError::validation("name", format!("Unknown tool: {other}"))),
        }
    }

    fn set_context(&self, args: SetContextArgs) -> Result<String> {
        if args.workspace_root.trim().is_empty() {
            return Err(BdError::validation("workspace_root", "cannot be empty"));
        }
        let snapshot = self.context.set(Path::new(&args.workspace_root));
        let root = display_or_not_set(snapshot.root.as_deref());
        let database = snapshot.db_path.as_ref().map_or_else(
            || "Not found (run 'bd init' to create)".to_string(),
            |db| db.display().to_string(),
        );
        Ok(format!(
            "Context set successfully:\n  Workspace root: {root}\n  Database: {database}"
        ))
    }

    fn where_am_i(&self) -> String {
        let snapshot = self.context.snapshot();
        let env_working_dir = self.env.var(ENV_WORKING_DIR).map(PathBuf::from);
        let env_db = self.env.var(ENV_DB).map(PathBuf::from);

        if !self.context.is_set(&self.env) {
            let cwd = std::env::current_dir().ok();
            return format!(
                "Context not set. Call set_context with your workspace root first.\n\
                 Current process CWD: {}\n\
                 BEADS_WORKING_DIR (persistent): {}\n\
                 BEADS_WORKING_DIR (env): {}\n\
                 BEADS_DB: {}",
                display_or_not_set(cwd.as_deref()),
                display_or_not_set(snapshot.root.as_deref()),
                display_or_not_set(env_working_dir.as_deref()),
                display_or_not_set(snapshot.db_path.as_deref().or(env_db.as_deref())),
            );
        }

        // A set context owns the database path, even when none was found.
        let db = if snapshot.is_set() {
            snapshot.db_path
        } else {
            env_db
        };
        let working_dir = snapshot.root.or(env_working_dir);
        format!(
            "Workspace root: {}\nDatabase: {}\nActor: {}",
            display_or_not_set(working_dir.as_deref()),
            display_or_not_set(db.as_deref()),
            self.env.var(ENV_ACTOR).as_deref().unwrap_or(NOT_SET),
        )
    }

    fn debug_env(&self) -> String {
        let var = |key: &str| self.env.var(key).unwrap_or_else(|| NOT_SET.to_string());
        let cwd = std::env::current_dir().ok();

        let mut out = String::from("=== Working Directory Debug Info ===\n");
        let _ = writeln!(out, "os.getcwd(): {}", display_or_not_set(cwd.as_deref()));
        let _ = writeln!(out, "BEADS_WORKING_DIR env var: {}", var(ENV_WORKING_DIR));
        let _ = writeln!(out, "BEADS_PATH env var: {}", var(ENV_PATH));
        let _ = writeln!(out, "BEADS_DB env var: {}", var(ENV_DB));
        let _ = writeln!(out, "HOME: {}", var("HOME"));
        let _ = writeln!(out, "USER: {}", var("USER"));
        out.push('\n');
        out.push_str("=== All Environment Variables ===");

        let mut vars: Vec<_> = self
            .env
            .vars()
            .into_iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .collect();
        vars.sort();
        for (key, value) in vars {
            let _ = write!(out, "\n{key}={value}");
        }
        out
    }

    /// `update`, routing lifecycle changes to close/reopen.
    fn update(&self, root: Option<&str>, params: UpdateParams) -> Result<String> {
        params.check()?;
        let client = self.write_client(root)?;
        match params.status {
            Some(Status::Closed) => {
                let reason = non_empty(params.notes.as_deref()).unwrap_or(DEFAULT_CLOSE_REASON);
                render(&client.close(&CloseParams {
                    issue_id: params.issue_id,
                    reason: reason.to_string(),
                })?)
            }
            Some(Status::Open) => {
                let reason = non_empty(params.notes.as_deref()).unwrap_or(DEFAULT_REOPEN_REASON);
                render(&client.reopen(&ReopenParams {
                    issue_ids: vec![params.issue_id],
                    reason: Some(reason.to_string()),
                })?)
            }
            _ => render(&client.update(&params)?),
        }
    }

    /// `dep`: bd failures come back as plain "Error: ..." text.
    fn add_dependency(&self, root: Option<&str>, params: AddDependencyParams) -> Result<String> {
        params.check()?;
        let client = self.write_client(root)?;
        match client.add_dependency(&params) {
            Ok(()) => Ok(format!(
                "Added dependency: {} depends on {} ({})",
                params.issue_id,
                params.depends_on_id,
                params.dep_type.as_str()
            )),
            Err(err) => Ok(format!("Error: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeRunner;
    use std::collections::HashMap;
    use std::fs;

    fn env_with(pairs: &[(&str, &str)]) -> impl EnvLookup + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![("BEADS_PATH", "/opt/bd"), ("BEADS_ACTOR", "agent")]
    }

    fn server(
        runner: FakeRunner,
        pairs: &[(&str, &str)],
    ) -> McpServer<FakeRunner, impl EnvLookup + use<>> {
        crate::logging::init_test_logging();
        McpServer::with_parts(runner, env_with(pairs))
    }

    fn call(server: &McpServer<FakeRunner, impl EnvLookup>, name: &str, args: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": args}
        });
        let response = server.handle_message(&request.to_string()).unwrap();
        serde_json::to_value(response).unwrap()["result"].clone()
    }

    fn text(result: &Value) -> &str {
        result["content"][0]["text"].as_str().unwrap()
    }

    #[test]
    fn test_initialize() {
        let server = server(FakeRunner::default(), &base_env());
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{}}"#)
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "beads-mcp");
    }

    #[test]
    fn test_protocol_errors() {
        let server = server(FakeRunner::default(), &base_env());

        let response = server.handle_message("{not json").unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);

        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"nope"}"#)
            .unwrap();
        assert_eq!(response.error.unwrap().code, protocol::METHOD_NOT_FOUND);

        let response =
            server.handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        assert!(response.is_none());
    }

    #[test]
    fn test_unknown_tool_is_invalid_params() {
        let server = server(FakeRunner::default(), &base_env());
        let request = json!({"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"frobnicate"}});
        let response = server.handle_message(&request.to_string()).unwrap();
        assert_eq!(response.error.unwrap().code, protocol::INVALID_PARAMS);
    }

    #[test]
    fn test_ready_strips_relations() {
        let runner = FakeRunner::ok(
            r#"[{"id":"bd-1","title":"One","dependencies":[{"id":"bd-0","title":"Zero"}],"dependents":[]}]"#,
        );
        let server = server(runner, &base_env());
        let result = call(&server, "ready", json!({"workspace_root": "/repo"}));
        assert!(result.get("isError").is_none());

        let issues: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(issues[0]["dependencies"], json!([]));

        let calls = server.runner.calls.borrow();
        assert_eq!(calls[0].program, PathBuf::from("/opt/bd"));
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/repo")));
        assert_eq!(
            calls[0].argv,
            vec!["ready", "--limit", "10", "--actor", "agent", "--json"]
        );
    }

    #[test]
    fn test_validation_failure_is_tool_error() {
        let server = server(FakeRunner::default(), &base_env());
        let result = call(&server, "ready", json!({"limit": 0}));
        assert_eq!(result["isError"], true);
        assert_eq!(
            text(&result),
            "Validation failed: limit: must be between 1 and 100"
        );
        assert!(server.runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_update_closed_routes_to_close() {
        let runner = FakeRunner::ok(r#"[{"id":"bd-3","status":"closed"}]"#);
        let server = server(runner, &base_env());
        call(&server, "update", json!({"issue_id": "bd-3", "status": "closed"}));
        assert_eq!(
            server.runner.last_argv(),
            vec!["close", "bd-3", "--reason", "Completed", "--actor", "agent", "--json"]
        );
    }

    #[test]
    fn test_update_open_routes_to_reopen_with_notes() {
        let runner = FakeRunner::ok(r#"[{"id":"bd-3","status":"open"}]"#);
        let server = server(runner, &base_env());
        call(
            &server,
            "update",
            json!({"issue_id": "bd-3", "status": "open", "notes": "flaky again"}),
        );
        assert_eq!(
            server.runner.last_argv(),
            vec!["reopen", "bd-3", "--reason", "flaky again", "--actor", "agent", "--json"]
        );
    }

    #[test]
    fn test_update_other_fields_uses_update() {
        let runner = FakeRunner::ok(r#"{"id":"bd-3","status":"in_progress"}"#);
        let server = server(runner, &base_env());
        let result = call(
            &server,
            "update",
            json!({"issue_id": "bd-3", "status": "in_progress"}),
        );
        assert!(text(&result).contains("in_progress"));
        assert_eq!(
            server.runner.last_argv(),
            vec!["update", "bd-3", "--status", "in_progress", "--actor", "agent", "--json"]
        );
    }

    #[test]
    fn test_close_default_reason() {
        let runner = FakeRunner::ok("[]");
        let server = server(runner, &base_env());
        call(&server, "close", json!({"issue_id": "bd-9", "reason": ""}));
        assert_eq!(
            server.runner.last_argv(),
            vec!["close", "bd-9", "--reason", "Completed", "--actor", "agent", "--json"]
        );
    }

    #[test]
    fn test_dep_success_and_failure_text() {
        let runner = FakeRunner::replying([
            Ok(String::new()),
            Err(BdError::Command {
                message: "bd command failed: no such issue".to_string(),
                stderr: "no such issue".to_string(),
                returncode: 1,
            }),
        ]);
        let server = server(runner, &base_env());

        let result = call(&server, "dep", json!({"issue_id": "bd-2", "depends_on_id": "bd-1"}));
        assert_eq!(text(&result), "Added dependency: bd-2 depends on bd-1 (blocks)");

        let result = call(
            &server,
            "dep",
            json!({"issue_id": "bd-2", "depends_on_id": "bd-7", "dep_type": "related"}),
        );
        assert_eq!(text(&result), "Error: bd command failed: no such issue");
        assert!(result.get("isError").is_none());
    }

    #[test]
    fn test_require_context_gate() {
        let mut pairs = base_env();
        pairs.push(("BEADS_REQUIRE_CONTEXT", "1"));
        let server = server(FakeRunner::default(), &pairs);

        let result = call(&server, "create", json!({"title": "New"}));
        assert_eq!(result["isError"], true);
        assert!(text(&result).starts_with("Context not set."));
        assert!(server.runner.calls.borrow().is_empty());

        // Reads are not gated.
        let server = McpServer::with_parts(FakeRunner::ok("[]"), env_with(&pairs));
        let result = call(&server, "list", json!({}));
        assert!(result.get("isError").is_none());
    }

    #[test]
    fn test_show_not_found() {
        let server = server(FakeRunner::ok("[]"), &base_env());
        let result = call(&server, "show", json!({"issue_id": "bd-404"}));
        assert_eq!(result["isError"], true);
        assert_eq!(text(&result), "Issue not found: bd-404");
    }

    #[test]
    fn test_set_context_and_where_am_i() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".beads")).unwrap();
        fs::write(dir.path().join(".beads").join("issues.db"), b"").unwrap();

        let server = server(FakeRunner::default(), &base_env());
        let result = call(&server, "where_am_i", json!({}));
        assert!(text(&result).starts_with("Context not set."));
        assert!(text(&result).contains("BEADS_DB: NOT SET"));

        let result = call(
            &server,
            "set_context",
            json!({"workspace_root": dir.path().to_string_lossy()}),
        );
        assert!(text(&result).starts_with("Context set successfully:"));
        assert!(text(&result).contains("issues.db"));

        let result = call(&server, "where_am_i", json!({}));
        assert!(text(&result).starts_with("Workspace root: "));
        assert!(text(&result).contains("issues.db"));
        assert!(text(&result).ends_with("Actor: agent"));
    }

    #[test]
    fn test_set_context_without_database() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(FakeRunner::default(), &base_env());
        let result = call(
            &server,
            "set_context",
            json!({"workspace_root": dir.path().to_string_lossy()}),
        );
        assert!(text(&result).ends_with("Database: Not found (run 'bd init' to create)"));
    }

    #[test]
    fn test_debug_env_layout() {
        let server = server(FakeRunner::default(), &base_env());
        let result = call(&server, "debug_env", json!({}));
        let text = text(&result);
        assert!(text.starts_with("=== Working Directory Debug Info ===\nos.getcwd(): "));
        assert!(text.contains("BEADS_PATH env var: /opt/bd"));
        assert!(text.contains("BEADS_DB env var: NOT SET"));
        assert!(text.ends_with("\n\n=== All Environment Variables ==="));
    }

    #[test]
    fn test_legacy_store_tools() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let server = server(FakeRunner::default(), &base_env());

        let result = call(&server, "beads_list", json!({"workspace_root": root}));
        assert_eq!(result["isError"], true);
        assert!(text(&result).contains("beads_init"));

        let result = call(&server, "beads_init", json!({"workspace_root": root}));
        assert_eq!(text(&result), "Initialized .beads directory.");

        let result = call(
            &server,
            "beads_add",
            json!({"workspace_root": root, "title": "Write docs"}),
        );
        let bead: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(bead["priority"], 1);
        let id = bead["id"].as_str().unwrap().to_string();

        let result = call(
            &server,
            "beads_update",
            json!({"workspace_root": root, "id": id, "status": "closed"}),
        );
        let bead: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(bead["status"], "closed");

        let result = call(&server, "beads_list", json!({"workspace_root": root}));
        let beads: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(beads.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_quickstart_resource() {
        let server = server(FakeRunner::ok("Welcome to bd"), &base_env());
        let response = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":2,"method":"resources/read","params":{"uri":"beads://quickstart"}}"#,
            )
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["contents"][0]["text"], "Welcome to bd");
        assert_eq!(server.runner.last_argv(), vec!["quickstart"]);
    }

    #[test]
    fn test_serve_writes_one_line_per_response() {
        let server = server(FakeRunner::default(), &base_env());
        let input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n";
        let mut output = Vec::new();
        server.serve(&input[..], &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert_eq!(output.trim(), r#"{"jsonrpc":"2.0","id":1,"result":{}}"#);
    }

    #[test]
    fn test_serve_survives_invalid_utf8_line() {
        let server = server(FakeRunner::default(), &base_env());
        let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        let mut output = Vec::new();
        server.serve(&input[..], &mut output).unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"], json!({}));
    }

    #[test]
    fn test_show_renders_bd_fields_verbatim() {
        let issue = json!({
            "id": "bd-3",
            "title": "Local clock",
            "status": "open",
            "priority": 2,
            "issue_type": "bug",
            "design": null,
            "created_at": "2025-10-14T10:22:33.123456-07:00"
        });
        let server = server(FakeRunner::ok(&format!("[{issue}]")), &base_env());
        let result = call(&server, "show", json!({"issue_id": "bd-3"}));
        let rendered: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(rendered, issue);
    }
}

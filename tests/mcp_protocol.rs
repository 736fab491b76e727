#![cfg(unix)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

use common::FakeBd;

fn beads_mcp(bd: &FakeBd) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_beads-mcp"));
    cmd.env("BEADS_PATH", bd.path())
        .env("BEADS_ACTOR", "protocol-test")
        .env_remove("BEADS_DB")
        .env_remove("BEADS_DIR")
        .env_remove("BEADS_WORKING_DIR")
        .env_remove("BEADS_REQUIRE_CONTEXT")
        .env_remove("BEADS_CONTEXT_SET")
        .env_remove("BEADS_NO_AUTO_FLUSH")
        .env_remove("BEADS_NO_AUTO_IMPORT")
        .env_remove("RUST_LOG");
    cmd
}

fn requests(messages: &[Value]) -> String {
    messages.iter().map(|m| format!("{m}\n")).collect()
}

fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each stdout line is JSON"))
        .collect()
}

#[test]
fn handshake_and_tool_listing() {
    let bd = FakeBd::new("", "", 0);
    let input = requests(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    ]);

    let output = beads_mcp(&bd).write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let replies = responses(&output.stdout);
    assert_eq!(replies.len(), 2, "notifications get no reply");
    assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");

    let tools = replies[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<_> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    for expected in ["set_context", "ready", "create", "update", "dep", "validate"] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
}

#[test]
fn tool_call_runs_bd() {
    let bd = FakeBd::new(r#"{"total_issues": 4, "open_issues": 3}"#, "", 0);
    let input = requests(&[json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {"name": "stats", "arguments": {}}
    })]);

    let output = beads_mcp(&bd).write_stdin(input).output().unwrap();
    let replies = responses(&output.stdout);
    let text = replies[0]["result"]["content"][0]["text"].as_str().unwrap();
    let stats: Value = serde_json::from_str(text).unwrap();
    assert_eq!(stats["total_issues"], 4);
    assert_eq!(bd.args(), vec!["stats", "--actor", "protocol-test", "--json"]);
}

#[test]
fn bd_failure_is_tool_error() {
    let bd = FakeBd::new("", "database is locked", 1);
    let input = requests(&[json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {"name": "list", "arguments": {"status": "open"}}
    })]);

    let output = beads_mcp(&bd).write_stdin(input).output().unwrap();
    let replies = responses(&output.stdout);
    assert_eq!(replies[0]["result"]["isError"], true);
    assert_eq!(
        replies[0]["result"]["content"][0]["text"],
        "bd command failed: database is locked"
    );
}

#[test]
fn malformed_line_gets_parse_error() {
    let bd = FakeBd::new("", "", 0);
    beads_mcp(&bd)
        .write_stdin("this is not json\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("-32700"))
        .stdout(predicate::str::contains("\"id\":null"));
}

#[test]
fn version_subcommand() {
    let bd = FakeBd::new("", "", 0);
    beads_mcp(&bd)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("beads-mcp "));
}

#[test]
fn config_subcommand_prints_resolved_settings() {
    let bd = FakeBd::new("", "", 0);
    let output = beads_mcp(&bd)
        .arg("config")
        .env("BEADS_NO_AUTO_FLUSH", "true")
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["actor"], "protocol-test");
    assert_eq!(config["no_auto_flush"], true);
    assert_eq!(config["beads_path"], bd.path().to_str().unwrap());
}

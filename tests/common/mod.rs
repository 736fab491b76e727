#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use beads_mcp::BeadsConfig;
use tempfile::TempDir;

/// A scripted stand-in for the bd executable.
///
/// The script records its argv, working directory and the `BEADS_DB` /
/// `BEADS_DIR` it saw, then prints canned stdout/stderr and exits.
pub struct FakeBd {
    dir: TempDir,
    path: PathBuf,
}

impl FakeBd {
    pub fn new(stdout: &str, stderr: &str, exit_code: i32) -> Self {
        Self::with_body(stdout, stderr, &format!("exit {exit_code}"))
    }

    /// bd that dies from SIGKILL instead of exiting.
    pub fn killed() -> Self {
        Self::with_body("", "", "kill -9 $$")
    }

    fn with_body(stdout: &str, stderr: &str, ending: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::write(root.join("stdout.txt"), stdout).expect("write stdout");
        fs::write(root.join("stderr.txt"), stderr).expect("write stderr");

        let d = root.display();
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > \"{d}/args.log\"\n\
             printf '%s' \"${{BEADS_DB-}}\" > \"{d}/beads_db.log\"\n\
             printf '%s' \"${{BEADS_DIR-}}\" > \"{d}/beads_dir.log\"\n\
             pwd -P > \"{d}/cwd.log\"\n\
             cat \"{d}/stdout.txt\"\n\
             cat \"{d}/stderr.txt\" >&2\n\
             {ending}\n"
        );
        let path = root.join("bd");
        fs::write(&path, script).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_log(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    pub fn args(&self) -> Vec<String> {
        self.read_log("args.log").lines().map(str::to_string).collect()
    }

    pub fn seen_beads_db(&self) -> String {
        self.read_log("beads_db.log")
    }

    pub fn seen_beads_dir(&self) -> String {
        self.read_log("beads_dir.log")
    }

    pub fn seen_cwd(&self) -> PathBuf {
        PathBuf::from(self.read_log("cwd.log").trim())
    }

    /// Minimal config pointing at this script.
    pub fn config(&self) -> BeadsConfig {
        BeadsConfig {
            beads_path: self.path.clone(),
            beads_dir: None,
            beads_db: None,
            actor: Some("tester".to_string()),
            no_auto_flush: false,
            no_auto_import: false,
            working_dir: None,
            require_context: false,
        }
    }
}

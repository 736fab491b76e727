//! Process execution seam.
//!
//! [`CommandRunner`] is the only place a child process is spawned; tests swap
//! in a recording fake.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{BdError, Result};

/// A fully resolved bd invocation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub program: &'a Path,
    pub argv: &'a [String],
    /// Working directory; `None` inherits the current one.
    pub cwd: Option<&'a Path>,
    /// Single environment override layered over the inherited environment.
    pub env: Option<(&'a str, &'a Path)>,
}

/// Runs bd and returns raw stdout on exit code 0.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation<'_>) -> Result<String>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &Invocation<'_>) -> Result<String> {
        (**self).run(invocation)
    }
}

/// Spawns bd with `std::process::Command`, capturing stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation<'_>) -> Result<String> {
        // A missing cwd also surfaces as ENOENT; keep it apart from "bd not found".
        if let Some(cwd) = invocation.cwd.filter(|cwd| !cwd.is_dir()) {
            return Err(BdError::Spawn(std::io::Error::new(
                ErrorKind::NotFound,
                format!("working directory does not exist: {}", cwd.display()),
            )));
        }

        let mut cmd = Command::new(invocation.program);
        cmd.args(invocation.argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = invocation.cwd {
            cmd.current_dir(cwd);
        }
        if let Some((key, value)) = invocation.env {
            cmd.env(key, value);
        }

        debug!(
            program = %invocation.program.display(),
            argv = ?invocation.argv,
            cwd = ?invocation.cwd,
            "Running bd"
        );

        let output = cmd.output().map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                BdError::NotFound {
                    path: invocation.program.to_path_buf(),
                }
            } else {
                BdError::Spawn(err)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        match output.status.code() {
            Some(0) => Ok(stdout),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let returncode = code.unwrap_or(-1);
                debug!(returncode, stderr = %stderr.trim(), "bd failed");
                Err(BdError::Command {
                    message: format!("bd command failed: {stderr}"),
                    stderr,
                    returncode,
                })
            }
        }
    }
}

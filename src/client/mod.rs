//! Typed façade over the bd CLI.
//!
//! Every operation follows the same path: build an argument vector
//! ([`command`]), attach global flags, run bd through a [`CommandRunner`],
//! then decode and shape-check stdout ([`decode`]).

pub mod command;
pub mod decode;
pub mod params;
pub mod runner;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::BeadsConfig;
use crate::error::Result;
use crate::model::{BlockedIssue, Issue, Stats};

pub use command::{CommandSpec, OutputMode};
pub use decode::{ExpectShape, decode_json, expect_shape};
pub use params::{
    AddDependencyParams, CloseParams, CreateParams, DetectPollutionParams, InitParams,
    ListParams, ReadyParams, ReopenParams, RepairDepsParams, ShowParams, UpdateParams,
    ValidateParams,
};
pub use runner::{CommandRunner, Invocation, ProcessRunner};

/// Client bound to one configuration and (optionally) one workspace root.
#[derive(Debug, Clone)]
pub struct BdClient<R = ProcessRunner> {
    config: BeadsConfig,
    workspace_root: Option<PathBuf>,
    runner: R,
}

impl BdClient<ProcessRunner> {
    /// Client that spawns real bd processes.
    #[must_use]
    pub fn new(config: BeadsConfig, workspace_root: Option<PathBuf>) -> Self {
        Self::with_runner(config, workspace_root, ProcessRunner)
    }
}

impl<R: CommandRunner> BdClient<R> {
    #[must_use]
    pub fn with_runner(config: BeadsConfig, workspace_root: Option<PathBuf>, runner: R) -> Self {
        let workspace_root = workspace_root.or_else(|| config.working_dir.clone());
        Self {
            config,
            workspace_root,
            runner,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BeadsConfig {
        &self.config
    }

    /// Directory bd runs in; `None` means the current directory.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    fn execute(&self, spec: &CommandSpec) -> Result<String> {
        let argv = spec.argv(&self.config.global_flags());
        debug!(operation = spec.operation, "Executing bd command");
        self.runner.run(&Invocation {
            program: &self.config.beads_path,
            argv: &argv,
            cwd: self.working_dir(),
            env: self.config.env_overlay(),
        })
    }

    fn run_json(&self, spec: &CommandSpec, shape: ExpectShape, subject: &str) -> Result<Value> {
        let stdout = self.execute(spec)?;
        let value = decode_json(&stdout)?;
        expect_shape(value, shape, spec.operation, subject)
    }

    fn run_typed<T: DeserializeOwned>(
        &self,
        spec: &CommandSpec,
        shape: ExpectShape,
        subject: &str,
    ) -> Result<T> {
        let value = self.run_json(spec, shape, subject)?;
        decode::into_typed(value, spec.operation)
    }

    fn run_object(&self, spec: &CommandSpec) -> Result<Map<String, Value>> {
        match self.run_json(spec, ExpectShape::Object, "")? {
            Value::Object(map) => Ok(map),
            _ => Err(crate::error::BdError::invalid_response(spec.operation)),
        }
    }

    /// Issues with no open blockers.
    pub fn ready(&self, params: &ReadyParams) -> Result<Vec<Issue>> {
        self.run_typed(&command::ready(params), ExpectShape::Array, "")
    }

    pub fn list_issues(&self, params: &ListParams) -> Result<Vec<Issue>> {
        self.run_typed(&command::list(params), ExpectShape::Array, "")
    }

    /// Full detail for one issue. An empty result is "Issue not found".
    pub fn show(&self, params: &ShowParams) -> Result<Issue> {
        self.run_typed(
            &command::show(params),
            ExpectShape::ArrayNonEmpty,
            &params.issue_id,
        )
    }

    pub fn create(&self, params: &CreateParams) -> Result<Issue> {
        self.run_typed(&command::create(params), ExpectShape::Object, "")
    }

    pub fn update(&self, params: &UpdateParams) -> Result<Issue> {
        self.run_typed(
            &command::update(params),
            ExpectShape::ArrayNonEmpty,
            &params.issue_id,
        )
    }

    pub fn close(&self, params: &CloseParams) -> Result<Vec<Issue>> {
        self.run_typed(&command::close(params), ExpectShape::Array, "")
    }

    pub fn reopen(&self, params: &ReopenParams) -> Result<Vec<Issue>> {
        self.run_typed(&command::reopen(params), ExpectShape::Array, "")
    }

    /// `bd dep add`. Text mode; success carries no payload.
    pub fn add_dependency(&self, params: &AddDependencyParams) -> Result<()> {
        self.execute(&command::add_dependency(params)).map(drop)
    }

    /// `bd quickstart` output, verbatim.
    pub fn quickstart(&self) -> Result<String> {
        self.execute(&command::quickstart())
    }

    pub fn stats(&self) -> Result<Stats> {
        self.run_typed(&command::stats(), ExpectShape::Object, "")
    }

    pub fn blocked(&self) -> Result<Vec<BlockedIssue>> {
        self.run_typed(&command::blocked(), ExpectShape::Array, "")
    }

    pub fn inspect_migration(&self) -> Result<Map<String, Value>> {
        self.run_object(&command::inspect_migration())
    }

    pub fn schema_info(&self) -> Result<Map<String, Value>> {
        self.run_object(&command::schema_info())
    }

    pub fn repair_deps(&self, params: RepairDepsParams) -> Result<Map<String, Value>> {
        self.run_object(&command::repair_deps(params))
    }

    pub fn detect_pollution(&self, params: DetectPollutionParams) -> Result<Map<String, Value>> {
        self.run_object(&command::detect_pollution(params))
    }

    pub fn validate(&self, params: &ValidateParams) -> Result<Map<String, Value>> {
        self.run_object(&command::validate(params))
    }

    /// `bd init`. Text mode; returns bd's stdout verbatim.
    pub fn init(&self, params: &InitParams) -> Result<String> {
        self.execute(&command::init(params))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    use super::{CommandRunner, Invocation};
    use crate::error::{BdError, Result};

    /// One recorded call.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub program: PathBuf,
        pub argv: Vec<String>,
        pub cwd: Option<PathBuf>,
        pub env: Option<(String, PathBuf)>,
    }

    /// Records invocations and replays scripted responses in order.
    #[derive(Debug, Default)]
    pub struct FakeRunner {
        pub calls: RefCell<Vec<Call>>,
        pub responses: RefCell<VecDeque<Result<String>>>,
    }

    impl FakeRunner {
        pub fn replying(responses: impl IntoIterator<Item = Result<String>>) -> Self {
            Self {
                calls: RefCell::default(),
                responses: RefCell::new(responses.into_iter().collect()),
            }
        }

        pub fn ok(stdout: &str) -> Self {
            Self::replying([Ok(stdout.to_string())])
        }

        pub fn last_argv(&self) -> Vec<String> {
            self.calls.borrow().last().map(|c| c.argv.clone()).unwrap_or_default()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, invocation: &Invocation<'_>) -> Result<String> {
            self.calls.borrow_mut().push(Call {
                program: invocation.program.to_path_buf(),
                argv: invocation.argv.to_vec(),
                cwd: invocation.cwd.map(std::path::Path::to_path_buf),
                env: invocation
                    .env
                    .map(|(k, v)| (k.to_string(), v.to_path_buf())),
            });
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(BdError::command("no scripted response")))
        }
    }
}

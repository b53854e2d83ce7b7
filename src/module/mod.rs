// ABOUTME: Ansible binary-module protocol: read a JSON args file, run a task, print one JSON response.
// ABOUTME: Handles the ANSIBLE_MODULE_ARGS wrapper, internal _ansible_* keys and check mode.

use serde_json::{Map, Value};
use std::path::Path;

use crate::command::Executor;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::tasks::params::ansible_bool;
use crate::tasks::{
    self, CopyParams, InspectParams, LoginParams, ParamsError, TaskKind, TaskParams, TaskResponse,
};

const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";
const INTERNAL_PREFIX: &str = "_ansible_";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";

/// Options handed to a module, with Ansible's internal keys removed.
#[derive(Debug, Clone, Default)]
pub struct ModuleArgs {
    check_mode: bool,
    options: Map<String, Value>,
}

impl ModuleArgs {
    pub fn from_json(text: &str) -> Result<Self> {
        let mut options = match serde_json::from_str(text)? {
            Value::Object(map) => map,
            _ => return Err(Error::ArgsNotAnObject),
        };

        if let Some(inner) = options.remove(WRAPPER_KEY) {
            options = match inner {
                Value::Object(map) => map,
                _ => return Err(Error::ArgsNotAnObject),
            };
        }

        let check_mode = match options.get(CHECK_MODE_KEY) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => ansible_bool::parse(s).unwrap_or(false),
            _ => false,
        };
        options.retain(|key, _| !key.starts_with(INTERNAL_PREFIX));

        Ok(Self {
            check_mode,
            options,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ArgsFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn check_mode(&self) -> bool {
        self.check_mode
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Deserialize the options for task `P`, rejecting names it does not accept.
    pub fn params<P: TaskParams>(&self) -> std::result::Result<P, ParamsError> {
        let mut unknown: Vec<String> = self
            .options
            .keys()
            .filter(|key| !P::OPTIONS.contains(&key.as_str()))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            unknown.sort();
            return Err(ParamsError::Unsupported {
                module: P::KIND.module_name(),
                names: unknown,
                supported: P::OPTIONS,
            });
        }

        Ok(serde_json::from_value(Value::Object(self.options.clone()))?)
    }

    /// Run `kind` with these options.
    pub async fn run(
        &self,
        kind: TaskKind,
        config: &Config,
        executor: &dyn Executor,
    ) -> TaskResponse {
        match kind {
            TaskKind::Copy => self.run_as::<CopyParams>(config, executor).await,
            TaskKind::Inspect => self.run_as::<InspectParams>(config, executor).await,
            TaskKind::Login => self.run_as::<LoginParams>(config, executor).await,
        }
    }

    async fn run_as<P: TaskParams>(&self, config: &Config, executor: &dyn Executor) -> TaskResponse {
        match self.params::<P>() {
            Ok(params) => tasks::run(params, self.check_mode, config, executor).await,
            // Raw options may hold secrets, so they are not echoed back.
            Err(e) => TaskResponse::failure(e.to_string()),
        }
    }
}

/// Load the args file at `args_path` and run `kind`, folding every failure into the response.
pub async fn run_module(
    kind: TaskKind,
    args_path: &Path,
    config: &Config,
    executor: &dyn Executor,
) -> TaskResponse {
    match ModuleArgs::load(args_path) {
        Ok(args) => {
            tracing::debug!(
                "{} called with {} option(s), check_mode={}",
                kind.module_name(),
                args.options().len(),
                args.check_mode()
            );
            args.run(kind, config, executor).await
        }
        Err(e) => {
            tracing::error!("{}", e);
            TaskResponse::failure(e.to_string())
        }
    }
}

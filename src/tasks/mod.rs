// ABOUTME: The copy, inspect and login tasks and the flow shared between them.
// ABOUTME: Options -> validated task -> skopeo invocation -> execution record -> response.

mod copy;
mod error;
mod inspect;
mod login;
pub mod params;
mod response;

pub use copy::{CopyParams, CopyTask};
pub use error::{ParamsError, ParamsSnafu, RunSnafu, TaskError, TaskErrorKind};
pub use inspect::{InspectParams, InspectTask};
pub use login::{LoginParams, LoginTask};
pub use response::{ModuleInvocation, TaskResponse};

use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::fmt;
use std::str::FromStr;

use crate::command::{ExecutionResult, Executor, Invocation};
use crate::config::Config;
use crate::diagnostics::Diagnostics;

/// The skopeo subcommands wrapped as tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Copy,
    Inspect,
    Login,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Copy, TaskKind::Inspect, TaskKind::Login];

    /// The skopeo subcommand.
    pub fn operation(&self) -> &'static str {
        match self {
            TaskKind::Copy => "copy",
            TaskKind::Inspect => "inspect",
            TaskKind::Login => "login",
        }
    }

    /// The Ansible module name, e.g. `skopeo_copy`.
    pub fn module_name(&self) -> &'static str {
        match self {
            TaskKind::Copy => "skopeo_copy",
            TaskKind::Inspect => "skopeo_inspect",
            TaskKind::Login => "skopeo_login",
        }
    }

    pub fn from_module_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.module_name() == name)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    /// Accepts either the subcommand (`copy`) or the module name (`skopeo_copy`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.operation() == s || k.module_name() == s)
            .ok_or_else(|| format!("unknown task '{s}' (expected copy, inspect or login)"))
    }
}

/// A validated task, ready to be turned into a skopeo invocation.
pub trait Task: Send + Sync {
    fn kind(&self) -> TaskKind;

    /// Append this task's subcommand, flags and positionals to `base`.
    fn invocation(&self, base: Invocation) -> Invocation;

    /// Whether a successful run changes something outside this host.
    ///
    /// Mutating tasks report `changed` on success and are never run in check mode.
    fn mutating(&self) -> bool {
        false
    }
}

/// Raw options for one task, as deserialized from module arguments or built by the CLI.
pub trait TaskParams: Serialize + DeserializeOwned {
    type Task: Task;

    const KIND: TaskKind;

    /// Every option name the task accepts, sorted.
    const OPTIONS: &'static [&'static str];

    /// Validate and normalise the options, recording non-fatal warnings.
    fn into_task(self, diag: &mut Diagnostics) -> Result<Self::Task, ParamsError>;
}

/// What happened when a task was executed.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The process ran to completion.
    Completed {
        kind: TaskKind,
        /// Redacted argument vector, executable first.
        cmd: Vec<String>,
        result: ExecutionResult,
        changed: bool,
        failed: bool,
        check_mode: bool,
    },
    /// A mutating task was not run because check mode was requested.
    Skipped { kind: TaskKind },
}

/// Validate options into a task, collecting warnings.
pub fn prepare<P: TaskParams>(params: P) -> Result<(P::Task, Diagnostics), TaskError> {
    let mut diag = Diagnostics::default();
    let task = params.into_task(&mut diag).context(ParamsSnafu)?;
    Ok((task, diag))
}

/// Run a task through `executor`.
///
/// In check mode a mutating task is skipped. Read-only tasks still run, but
/// the outcome is always reported as failed.
pub async fn execute<T: Task + ?Sized>(
    task: &T,
    config: &Config,
    executor: &dyn Executor,
    check_mode: bool,
) -> Result<Outcome, TaskError> {
    let kind = task.kind();

    if check_mode && task.mutating() {
        tracing::info!("check mode: skopeo {} not run", kind);
        return Ok(Outcome::Skipped { kind });
    }

    let invocation = task.invocation(config.invocation());
    tracing::info!("running {}", invocation);

    let result = executor
        .execute(&invocation)
        .await
        .context(RunSnafu { task: kind })?;

    if result.failed() {
        tracing::warn!("skopeo {} exited with code {}", kind, result.exit_code());
    }

    let cmd = std::iter::once(invocation.executable().to_string())
        .chain(invocation.redacted_args().iter().cloned())
        .collect();

    Ok(Outcome::Completed {
        kind,
        cmd,
        changed: task.mutating() && result.succeeded(),
        failed: check_mode || result.failed(),
        result,
        check_mode,
    })
}

/// Prepare and execute a task, folding every failure into the response.
pub async fn run<P: TaskParams>(
    params: P,
    check_mode: bool,
    config: &Config,
    executor: &dyn Executor,
) -> TaskResponse {
    // Secrets serialize as the no_log placeholder.
    let module_args = serde_json::to_value(&params).unwrap_or(serde_json::Value::Null);

    let (task, diag) = match prepare(params) {
        Ok(prepared) => prepared,
        Err(TaskError::Params { source }) => {
            return TaskResponse::failure(source.to_string()).with_module_args(module_args);
        }
        Err(e) => return TaskResponse::failure(e.to_string()).with_module_args(module_args),
    };

    let response = match execute(&task, config, executor, check_mode).await {
        Ok(outcome) => TaskResponse::from_outcome(outcome),
        Err(e) => {
            tracing::error!("{}", e);
            TaskResponse::failure(e.to_string())
        }
    };

    let warnings = diag.warnings().iter().map(|w| w.message.clone()).collect();
    response
        .with_warnings(warnings)
        .with_module_args(module_args)
}

// ABOUTME: Task error types: option validation (thiserror) unified with run faults (SNAFU).
// ABOUTME: kind() classifies failures for programmatic handling.

use snafu::Snafu;
use thiserror::Error;

use super::TaskKind;
use crate::command::RunError;
use crate::types::{ParseImageRefError, RegistryError};

/// Problems with the options handed to a task.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("missing required arguments: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error(
        "Unsupported parameters for ({module}) module: {}. Supported parameters include: {}.",
        .names.join(", "),
        .supported.join(", ")
    )]
    Unsupported {
        module: &'static str,
        names: Vec<String>,
        supported: &'static [&'static str],
    },

    #[error("invalid module arguments: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("argument {option}: {source}")]
    Image {
        option: &'static str,
        #[source]
        source: ParseImageRefError,
    },

    #[error("argument registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Unified task error for option and execution failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TaskError {
    #[snafu(display("invalid task options: {source}"))]
    Params { source: ParamsError },

    #[snafu(display("skopeo {task} could not be run: {source}"))]
    Run { task: TaskKind, source: RunError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskErrorKind {
    /// Options were missing, unknown, or malformed.
    InvalidOptions,
    /// The skopeo executable could not be found.
    ExecutableNotFound,
    /// The skopeo executable could not be executed.
    PermissionDenied,
    /// The process did not finish within the timeout.
    Timeout,
    /// Any other failure to start or collect the process.
    Spawn,
}

impl TaskError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> TaskErrorKind {
        match self {
            TaskError::Params { .. } => TaskErrorKind::InvalidOptions,
            TaskError::Run { source, .. } => match source {
                RunError::ExecutableNotFound(_) => TaskErrorKind::ExecutableNotFound,
                RunError::PermissionDenied(_) => TaskErrorKind::PermissionDenied,
                RunError::Timeout { .. } => TaskErrorKind::Timeout,
                RunError::Spawn { .. } | RunError::Wait { .. } | RunError::Runtime(_) => {
                    TaskErrorKind::Spawn
                }
            },
        }
    }
}

impl From<ParamsError> for TaskError {
    fn from(source: ParamsError) -> Self {
        TaskError::Params { source }
    }
}

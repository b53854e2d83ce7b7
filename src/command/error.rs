// ABOUTME: Operational faults raised while running an external command.
// ABOUTME: A nonzero exit code is not an error; these cover spawn failures and timeouts.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Faults that leave no meaningful exit code to report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("executable not found: '{0}' (is it installed and on the PATH?)")]
    ExecutableNotFound(String),

    #[error("permission denied executing '{0}'")]
    PermissionDenied(String),

    #[error("failed to spawn '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect output of '{executable}': {source}")]
    Wait {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("'{executable}' timed out after {timeout:?}")]
    Timeout {
        executable: String,
        timeout: Duration,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl RunError {
    /// Classify an I/O error returned by `spawn`.
    pub(crate) fn from_spawn(executable: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => RunError::ExecutableNotFound(executable.to_string()),
            io::ErrorKind::PermissionDenied => RunError::PermissionDenied(executable.to_string()),
            _ => RunError::Spawn {
                executable: executable.to_string(),
                source,
            },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::Timeout { .. })
    }
}

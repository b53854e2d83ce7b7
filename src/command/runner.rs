// ABOUTME: Executor seam and the real process-spawning implementation.
// ABOUTME: Captures full output, enforces the timeout, kills the child when it expires.

use async_trait::async_trait;
use chrono::Utc;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;

use super::error::RunError;
use super::invocation::Invocation;
use super::result::ExecutionResult;

/// Runs an [`Invocation`] to completion.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run the command. A nonzero exit code is returned as a normal result.
    async fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, RunError>;
}

/// Spawns the invocation as a local child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, RunError> {
        let executable = invocation.executable();
        tracing::debug!("spawning {}", invocation);

        let started_at = Utc::now();
        let clock = Instant::now();

        let child = Command::new(executable)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::from_spawn(executable, e))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(invocation.timeout(), child.wait_with_output()).await
        {
            Ok(output) => output.map_err(|source| RunError::Wait {
                executable: executable.to_string(),
                source,
            })?,
            Err(_) => {
                tracing::warn!(
                    "{} did not finish within {:?}, killed",
                    executable,
                    invocation.timeout()
                );
                return Err(RunError::Timeout {
                    executable: executable.to_string(),
                    timeout: invocation.timeout(),
                });
            }
        };

        let exit_code = exit_code(output.status);
        tracing::debug!("{} exited with code {}", executable, exit_code);

        Ok(ExecutionResult::new(
            exit_code,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
        .with_timing(started_at, clock.elapsed()))
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

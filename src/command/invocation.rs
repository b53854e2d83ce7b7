// ABOUTME: A configured, not-yet-run external command.
// ABOUTME: Keeps a redacted copy of the arguments so secrets never reach the logs.

use std::fmt;
use std::io;
use std::time::Duration;

use super::error::RunError;
use super::result::ExecutionResult;
use super::runner::{Executor, ProcessExecutor};

/// Executable used when nothing else is configured.
pub const DEFAULT_EXECUTABLE: &str = "skopeo";

/// Wall-clock limit used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Placeholder shown instead of a secret in logs and responses.
pub const REDACTED: &str = "********";

/// One external process call: executable, ordered arguments and timeout.
///
/// Built once with the `with_*` methods and then only read. Relative
/// executables are resolved through `PATH` when the process is spawned.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    executable: String,
    args: Vec<String>,
    redacted: Vec<String>,
    timeout: Duration,
}

impl Invocation {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            redacted: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// An invocation of the default `skopeo` executable.
    pub fn skopeo() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }

    /// Append one argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        self.redacted.push(arg.clone());
        self.args.push(arg);
        self
    }

    /// Append several arguments, in order.
    pub fn with_args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        args.into_iter().fold(self, |inv, arg| inv.with_arg(arg))
    }

    /// Append an argument carrying a secret. `shown` replaces it in logs.
    pub fn with_sensitive_arg(mut self, arg: impl Into<String>, shown: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self.redacted.push(shown.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Arguments exactly as passed to the process.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with secrets replaced, safe to log.
    pub fn redacted_args(&self) -> &[String] {
        &self.redacted
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the command, waiting for it to exit or for the timeout to elapse.
    pub async fn run(&self) -> Result<ExecutionResult, RunError> {
        ProcessExecutor.execute(self).await
    }

    /// Same as [`Invocation::run`], for callers without an async runtime.
    ///
    /// Fails with [`RunError::Runtime`] when called from inside a tokio runtime.
    pub fn run_blocking(&self) -> Result<ExecutionResult, RunError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(RunError::Runtime(io::Error::other(
                "run_blocking called from within an async runtime; use run() instead",
            )));
        }

        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?
            .block_on(self.run())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("executable", &self.executable)
            .field("args", &self.redacted)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Renders the redacted command line.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.redacted {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

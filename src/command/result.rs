// ABOUTME: Captured outcome of one completed external process run.
// ABOUTME: Exit code, full stdout and stderr, plus when it ran and for how long.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Outcome of exactly one process run that terminated on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    started_at: DateTime<Utc>,
    elapsed: Duration,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Attach the start time and duration of the run.
    pub fn with_timing(mut self, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        self.started_at = started_at;
        self.elapsed = elapsed;
        self
    }

    /// Process exit code. A process killed by a signal reports the negated signal number.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout.lines().map(str::to_string).collect()
    }

    pub fn stderr_lines(&self) -> Vec<String> {
        self.stderr.lines().map(str::to_string).collect()
    }

    pub fn failed(&self) -> bool {
        self.exit_code != 0
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.elapsed)
            .ok()
            .and_then(|delta| self.started_at.checked_add_signed(delta))
            .unwrap_or(self.started_at)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Human-readable rendering of exit code, stdout and stderr.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{return_code: {}, stdout: {:?}, stderr: {:?}}}",
            self.exit_code, self.stdout, self.stderr
        )
    }
}

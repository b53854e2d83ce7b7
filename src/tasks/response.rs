// ABOUTME: The structured result a task reports back to Ansible or the CLI.
// ABOUTME: Mirrors Ansible module return values: changed, failed, msg, rc and output lines.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::{Outcome, TaskKind};

/// Response object printed by a module run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskResponse {
    pub changed: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub failed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_lines: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_lines: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<ModuleInvocation>,
}

/// Options echoed back to Ansible, with secrets masked.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInvocation {
    pub module_args: serde_json::Value,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl TaskResponse {
    /// A failure with no process output, e.g. bad options or an operational fault.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            failed: true,
            msg: Some(msg.into()),
            ..Default::default()
        }
    }

    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Skipped { kind } => Self::failure(format!(
                "check mode is not supported for skopeo {kind}; nothing was run"
            )),
            Outcome::Completed {
                kind,
                cmd,
                result,
                changed,
                failed,
                check_mode,
            } => {
                let msg = failed.then(|| {
                    failure_message(kind, result.stderr(), result.exit_code(), check_mode)
                });
                Self {
                    changed,
                    failed,
                    msg,
                    return_code: Some(result.exit_code()),
                    stdout_lines: Some(result.stdout_lines()),
                    stderr_lines: Some(result.stderr_lines()),
                    stdout: Some(result.stdout().to_string()),
                    stderr: Some(result.stderr().to_string()),
                    cmd: Some(cmd),
                    start: Some(format_timestamp(result.started_at())),
                    end: Some(format_timestamp(result.finished_at())),
                    delta: Some(format_delta(result.elapsed())),
                    ..Default::default()
                }
            }
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_module_args(mut self, module_args: serde_json::Value) -> Self {
        self.invocation = Some(ModuleInvocation { module_args });
        self
    }

    pub fn is_success(&self) -> bool {
        !self.failed
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The captured stderr when there is any, otherwise a description of what went wrong.
fn failure_message(kind: TaskKind, stderr: &str, exit_code: i32, check_mode: bool) -> String {
    if !stderr.trim().is_empty() {
        stderr.to_string()
    } else if check_mode {
        format!("check mode is not supported for skopeo {kind}")
    } else {
        format!("skopeo {kind} exited with code {exit_code}")
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// `H:MM:SS.ffffff`, the way Ansible reports command durations.
fn format_delta(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

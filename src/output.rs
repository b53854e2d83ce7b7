// ABOUTME: Output formatting for task responses.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes; module mode always prints JSON.

use serde::Serialize;
use std::time::Instant;

use crate::tasks::TaskResponse;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (skopeo's own stdout and errors only)
    Quiet,
    /// The full task response as one JSON object
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            eprintln!("{message}");
        }
    }

    /// Print a warning (suppressed in json mode, where warnings travel in the response).
    pub fn warning(&self, message: &str) {
        if self.mode != OutputMode::Json {
            eprintln!("Warning: {message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            let elapsed = self.elapsed_secs();
            if elapsed > 0.0 {
                eprintln!("{message} ({:.1}s)", elapsed);
            } else {
                eprintln!("{message}");
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {}", message.trim_end());
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Report a finished task.
    ///
    /// Skopeo's stdout (e.g. inspect's JSON) goes to stdout; everything else to stderr.
    pub fn response(&self, response: &TaskResponse) {
        if self.mode == OutputMode::Json {
            print_json(response);
            return;
        }

        for warning in &response.warnings {
            self.warning(warning);
        }

        if let Some(stdout) = response.stdout.as_deref().filter(|s| !s.is_empty()) {
            print!("{stdout}");
        }

        if response.is_success() {
            let state = if response.changed { "changed" } else { "ok" };
            let cmd = response
                .cmd
                .as_ref()
                .map(|cmd| cmd.join(" "))
                .unwrap_or_default();
            self.success(&format!("{state}: {cmd}"));
        } else {
            self.error(response.msg.as_deref().unwrap_or("task failed"));
        }
    }
}

/// Print a response as one line of JSON on stdout.
pub fn print_json(response: &TaskResponse) {
    match response.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            // Still hand Ansible something it can parse.
            let fallback = serde_json::json!({
                "failed": true,
                "msg": format!("could not serialize response: {e}"),
            });
            println!("{fallback}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

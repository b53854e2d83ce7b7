// ABOUTME: Diagnostics accumulator for non-fatal warnings while preparing a task.
// ABOUTME: Warnings end up in the response's `warnings` list instead of failing the task.

/// Collects non-fatal warnings during option normalisation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. It is logged at debug level; callers decide how to surface it.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind, "warning: {}", warning.message);
        self.warnings.push(warning);
    }

    /// Warnings in the order they were recorded.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected while preparing a task.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// One half of a username/password pair was given without the other.
    pub fn incomplete_credentials(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::IncompleteCredentials,
            message: message.into(),
        }
    }

    /// An image reference has no transport skopeo recognises.
    pub fn missing_transport(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingTransport,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur while preparing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Credential flag omitted because the pair was incomplete.
    IncompleteCredentials,
    /// Image reference passed through without a transport prefix.
    MissingTransport,
}

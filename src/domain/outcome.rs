//! Job outcomes as reported to the orchestrator.

use std::fmt;

use super::token::JobState;

/// Orchestrator failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    JobFailed,
    ConfigurationError,
    PermissionError,
    RevisionOutOfSync,
    RevisionUnavailable,
    SystemUnavailable,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::JobFailed => "JobFailed",
            FailureKind::ConfigurationError => "ConfigurationError",
            FailureKind::PermissionError => "PermissionError",
            FailureKind::RevisionOutOfSync => "RevisionOutOfSync",
            FailureKind::RevisionUnavailable => "RevisionUnavailable",
            FailureKind::SystemUnavailable => "SystemUnavailable",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure sent with a failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureDetails {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn job_failed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::JobFailed, message)
    }

    /// Cut the message down to at most `max_chars` characters.
    #[must_use]
    pub fn truncated(mut self, max_chars: usize) -> Self {
        if let Some((idx, _)) = self.message.char_indices().nth(max_chars) {
            self.message.truncate(idx);
        }
        self
    }
}

/// What a handler decided for the current invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Terminal success.
    Succeeded { message: String },
    /// Not done yet; the orchestrator should invoke again with `state`.
    Continue { state: JobState, message: String },
    /// Terminal failure.
    Failed(FailureDetails),
}

impl Outcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Outcome::Succeeded {
            message: message.into(),
        }
    }

    pub fn continue_with(state: JobState, message: impl Into<String>) -> Self {
        Outcome::Continue {
            state,
            message: message.into(),
        }
    }

    pub fn failed(details: FailureDetails) -> Self {
        Outcome::Failed(details)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        matches!(self, Outcome::Continue { .. })
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

use thiserror::Error;

use crate::domain::FailureKind;

/// Configuration-related errors with structured variants.
///
/// Covers both the per-job action configuration supplied by the
/// orchestrator and the handler's own settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required parameter: {key}")]
    MissingParameter { key: String },

    #[error("malformed parameter '{segment}': expected key=value")]
    MalformedParameter { segment: String },

    #[error("input artifact named \"{name}\" not found in job")]
    ArtifactNotFound { name: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while reading entries out of a packaged artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to fetch s3://{bucket}/{key}: {reason}")]
    FetchFailed {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("entry '{entry}' not found in artifact package")]
    EntryNotFound { entry: String },

    #[error("entry '{entry}' is not valid UTF-8")]
    NotUtf8 { entry: String },

    #[error("failed to open artifact package: {0}")]
    Package(String),
}

/// Failure returned by one of the remote backends.
///
/// Backend errors are never retried in-process; the orchestrator's own
/// retry policy decides whether the stage runs again.
#[derive(Error, Debug, Clone)]
#[error("{service} {operation} failed: {message}")]
pub struct BackendError {
    pub service: &'static str,
    pub operation: &'static str,
    pub message: String,
}

impl BackendError {
    pub fn new(service: &'static str, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            operation,
            message: message.into(),
        }
    }
}

/// Continuation token decoding errors.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("continuation token is not valid: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("continuation token is empty")]
    Empty,

    #[error("continuation token does not describe a started job")]
    NotResumable,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed invocation event: {0}")]
    Event(#[source] serde_json::Error),

    #[error("no resource '{logical_id}' in stack {stack}")]
    ResourceNotFound { stack: String, logical_id: String },

    #[error("handler aborted: {0}")]
    Internal(String),
}

impl Error {
    /// The orchestrator failure category this error is reported under.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Config(_) | Error::Token(_) | Error::Event(_) => {
                FailureKind::ConfigurationError
            }
            _ => FailureKind::JobFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

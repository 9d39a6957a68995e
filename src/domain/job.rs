//! Job invocation model.

use std::fmt;

use super::id::JobId;
use crate::error::ConfigError;

/// Object-storage coordinates of a packaged artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub key: String,
}

/// A named input artifact attached to a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArtifact {
    pub name: String,
    pub location: ArtifactLocation,
}

/// Short-lived, job-scoped credentials for the artifact store.
#[derive(Clone, PartialEq, Eq)]
pub struct ArtifactCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl fmt::Debug for ArtifactCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// One execution attempt of a pipeline job.
///
/// Created by the orchestrator per invocation and consumed entirely within
/// the handler.
#[derive(Debug, Clone)]
pub struct JobInvocation {
    pub id: JobId,
    pub input_artifacts: Vec<InputArtifact>,
    /// Raw action configuration (`key=value,key=value`).
    pub user_parameters: String,
    pub credentials: ArtifactCredentials,
    /// Token returned by a previous attempt of the same logical job.
    pub continuation_token: Option<String>,
}

impl JobInvocation {
    /// Find an input artifact by name.
    pub fn find_artifact(&self, name: &str) -> Result<&InputArtifact, ConfigError> {
        self.input_artifacts
            .iter()
            .find(|artifact| artifact.name == name)
            .ok_or_else(|| ConfigError::ArtifactNotFound {
                name: name.to_string(),
            })
    }

    /// True when this attempt resumes an earlier one.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.continuation_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> JobInvocation {
        JobInvocation {
            id: JobId::from("job-1"),
            input_artifacts: vec![InputArtifact {
                name: "BuildOutput".into(),
                location: ArtifactLocation {
                    bucket: "bucket".into(),
                    key: "key.zip".into(),
                },
            }],
            user_parameters: String::new(),
            credentials: ArtifactCredentials {
                access_key_id: "AKIA".into(),
                secret_access_key: "secret".into(),
                session_token: "session".into(),
            },
            continuation_token: None,
        }
    }

    #[test]
    fn finds_artifact_by_name() {
        let job = invocation();
        assert_eq!(job.find_artifact("BuildOutput").unwrap().location.key, "key.zip");
    }

    #[test]
    fn missing_artifact_is_a_configuration_error() {
        let job = invocation();
        let err = job.find_artifact("Other").unwrap_err();
        assert_eq!(
            err.to_string(),
            "input artifact named \"Other\" not found in job"
        );
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let rendered = format!("{:?}", invocation().credentials);
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("session\""));
    }
}

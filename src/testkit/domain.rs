//! Builders for job invocations used across tests.

use crate::domain::{ArtifactCredentials, ArtifactLocation, InputArtifact, JobId, JobInvocation};

/// Name of the input artifact attached by [`invocation`].
pub const ARTIFACT_NAME: &str = "BuildOutput";
/// Bucket holding the artifact attached by [`invocation`].
pub const ARTIFACT_BUCKET: &str = "artifacts";
/// Object key of the artifact attached by [`invocation`].
pub const ARTIFACT_KEY: &str = "out.zip";

/// A fresh job with one input artifact at `artifacts/out.zip`.
pub fn invocation(job_id: &str, user_parameters: &str) -> JobInvocation {
    JobInvocation {
        id: JobId::from(job_id),
        input_artifacts: vec![InputArtifact {
            name: ARTIFACT_NAME.to_string(),
            location: ArtifactLocation {
                bucket: ARTIFACT_BUCKET.to_string(),
                key: ARTIFACT_KEY.to_string(),
            },
        }],
        user_parameters: user_parameters.to_string(),
        credentials: ArtifactCredentials {
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: "test-secret".to_string(),
            session_token: "test-session".to_string(),
        },
        continuation_token: None,
    }
}

/// The same job resumed with `token`.
pub fn resumed(job_id: &str, user_parameters: &str, token: &str) -> JobInvocation {
    JobInvocation {
        continuation_token: Some(token.to_string()),
        ..invocation(job_id, user_parameters)
    }
}

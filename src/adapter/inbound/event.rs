//! Orchestrator invocation event decoding.
//!
//! The host receives one JSON document per invocation:
//!
//! ```json
//! {
//!   "CodePipeline.job": {
//!     "id": "11111111-abcd-1111-abcd-111111abcdef",
//!     "data": {
//!       "actionConfiguration": {
//!         "configuration": { "UserParameters": "artifact=BuildOutput,stack_prefix=app" }
//!       },
//!       "inputArtifacts": [
//!         {
//!           "name": "BuildOutput",
//!           "location": {
//!             "type": "S3",
//!             "s3Location": { "bucketName": "artifacts", "objectKey": "app/BuildOutput/abc.zip" }
//!           }
//!         }
//!       ],
//!       "artifactCredentials": {
//!         "accessKeyId": "AKIA...",
//!         "secretAccessKey": "...",
//!         "sessionToken": "..."
//!       },
//!       "continuationToken": "{\"state\":\"polling\",...}"
//!     }
//!   }
//! }
//! ```

use serde::Deserialize;

use crate::domain::{ArtifactCredentials, ArtifactLocation, InputArtifact, JobId, JobInvocation};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct PipelineEvent {
    #[serde(rename = "CodePipeline.job")]
    job: JobDto,
}

#[derive(Deserialize)]
struct JobDto {
    id: String,
    data: JobDataDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDataDto {
    #[serde(default)]
    input_artifacts: Vec<ArtifactDto>,
    action_configuration: ActionConfigurationDto,
    artifact_credentials: CredentialsDto,
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Deserialize)]
struct ActionConfigurationDto {
    #[serde(default)]
    configuration: ConfigurationDto,
}

#[derive(Deserialize, Default)]
struct ConfigurationDto {
    #[serde(rename = "UserParameters", default)]
    user_parameters: String,
}

#[derive(Deserialize)]
struct ArtifactDto {
    name: String,
    location: LocationDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDto {
    s3_location: S3LocationDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct S3LocationDto {
    bucket_name: String,
    object_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsDto {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
}

impl From<PipelineEvent> for JobInvocation {
    fn from(event: PipelineEvent) -> Self {
        let data = event.job.data;
        JobInvocation {
            id: JobId::new(event.job.id),
            input_artifacts: data
                .input_artifacts
                .into_iter()
                .map(|artifact| InputArtifact {
                    name: artifact.name,
                    location: ArtifactLocation {
                        bucket: artifact.location.s3_location.bucket_name,
                        key: artifact.location.s3_location.object_key,
                    },
                })
                .collect(),
            user_parameters: data.action_configuration.configuration.user_parameters,
            credentials: ArtifactCredentials {
                access_key_id: data.artifact_credentials.access_key_id,
                secret_access_key: data.artifact_credentials.secret_access_key,
                session_token: data.artifact_credentials.session_token,
            },
            continuation_token: data.continuation_token,
        }
    }
}

/// Decode an invocation event from its JSON text.
pub fn parse_event(raw: &str) -> Result<JobInvocation> {
    let event: PipelineEvent = serde_json::from_str(raw).map_err(Error::Event)?;
    Ok(event.into())
}

/// Decode an invocation event the host has already parsed.
pub fn decode_event(value: serde_json::Value) -> Result<JobInvocation> {
    let event: PipelineEvent = serde_json::from_value(value).map_err(Error::Event)?;
    Ok(event.into())
}

/// Job id of an event, read without decoding anything else.
///
/// Lets a malformed event still be failed against its job.
#[must_use]
pub fn event_job_id(value: &serde_json::Value) -> Option<JobId> {
    value
        .get("CodePipeline.job")?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
        .map(JobId::from)
}

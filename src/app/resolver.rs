//! Parameter resolution: action configuration, resumable state, and the
//! build-derived stack names.

use tracing::debug;

use super::artifact::ArtifactReader;
use crate::domain::{BuildId, JobInvocation, JobState, ParameterMap, StackName};
use crate::error::Result;

/// Everything a handler needs from the invocation before touching a backend.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub params: ParameterMap,
    pub state: JobState,
}

/// Parse the action configuration and decode the continuation token.
///
/// Both are validated up front so a bad token or configuration never
/// reaches a backend mutation.
pub fn resolve(job: &JobInvocation) -> Result<ResolvedJob> {
    let params = ParameterMap::parse(&job.user_parameters)?;
    let state = JobState::resume(job.continuation_token.as_deref())?;
    debug!(
        job_id = %job.id,
        parameters = params.len(),
        attempt = state.attempt(),
        "Resolved job parameters"
    );
    Ok(ResolvedJob { params, state })
}

/// Read the build id from the artifact's marker entry.
pub fn build_id(reader: &ArtifactReader, marker_entry: &str) -> Result<BuildId> {
    let raw = reader.read_text(marker_entry)?;
    Ok(BuildId::from_marker(&raw)?)
}

/// Stack name for the prefix stored under `prefix_key`.
pub fn stack_name(params: &ParameterMap, prefix_key: &str, build: &BuildId) -> Result<StackName> {
    let prefix = params.require(prefix_key)?;
    Ok(StackName::derive(prefix, build)?)
}

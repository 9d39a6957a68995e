//! Orchestrator job result port.

use async_trait::async_trait;

use crate::domain::{ContinuationToken, FailureDetails, JobId};
use crate::error::BackendError;

/// Result-reporting side of the orchestrator's job API.
///
/// Each job attempt should receive exactly one of these calls.
#[async_trait]
pub trait JobResultApi: Send + Sync {
    /// Mark the job as finished successfully.
    async fn put_success(&self, job_id: &JobId) -> Result<(), BackendError>;

    /// Mark the attempt successful but ask to be invoked again with `token`.
    async fn put_continuation(
        &self,
        job_id: &JobId,
        token: &ContinuationToken,
    ) -> Result<(), BackendError>;

    /// Mark the job as failed.
    async fn put_failure(&self, job_id: &JobId, failure: &FailureDetails)
        -> Result<(), BackendError>;
}

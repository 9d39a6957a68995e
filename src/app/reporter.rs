//! Job result reporting.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{ContinuationToken, FailureDetails, JobId, JobState, Outcome};
use crate::error::Result;
use crate::port::JobResultApi;

/// Sends exactly one result per job attempt to the orchestrator.
#[derive(Clone)]
pub struct JobReporter {
    api: Arc<dyn JobResultApi>,
    max_message_chars: usize,
}

impl JobReporter {
    pub fn new(api: Arc<dyn JobResultApi>, max_message_chars: usize) -> Self {
        Self {
            api,
            max_message_chars,
        }
    }

    /// Report whichever result `outcome` describes.
    pub async fn report(&self, job_id: &JobId, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::Succeeded { message } => self.succeed(job_id, message).await,
            Outcome::Continue { state, message } => {
                self.continue_later(job_id, state, message).await.map(|_| ())
            }
            Outcome::Failed(details) => self.fail(job_id, details.clone()).await,
        }
    }

    pub async fn succeed(&self, job_id: &JobId, message: &str) -> Result<()> {
        info!(job_id = %job_id, message = %message, "Putting job success");
        self.api.put_success(job_id).await?;
        Ok(())
    }

    /// Report success with a continuation token so the orchestrator invokes
    /// the job again later.
    pub async fn continue_later(
        &self,
        job_id: &JobId,
        state: &JobState,
        message: &str,
    ) -> Result<ContinuationToken> {
        let token = ContinuationToken::encode(state)?;
        info!(
            job_id = %job_id,
            attempt = state.attempt(),
            message = %message,
            "Putting job continuation"
        );
        self.api.put_continuation(job_id, &token).await?;
        Ok(token)
    }

    pub async fn fail(&self, job_id: &JobId, details: FailureDetails) -> Result<()> {
        let details = details.truncated(self.max_message_chars);
        error!(
            job_id = %job_id,
            kind = %details.kind,
            message = %details.message,
            "Putting job failure"
        );
        self.api.put_failure(job_id, &details).await?;
        Ok(())
    }
}

//! Stack lifecycle driver.
//!
//! Stack operations outlast a single invocation, so the driver is a
//! resumable state machine:
//!
//! ```text
//! NotStarted ──create/update──▶ Polling ──CREATE/UPDATE_COMPLETE──▶ Succeeded
//!                                  │  ▲
//!                                  └──┘ in progress: continue again
//!                                  │
//!                                  └──any other status──▶ Failed
//! ```
//!
//! The first (token-less) invocation issues the only mutation. Every resumed
//! invocation is a single status read, so the orchestrator may redeliver a
//! continuation any number of times. The driver never sleeps; the
//! orchestrator schedules the next poll.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{FailureDetails, JobId, JobState, Outcome, StackName, StackPhase};
use crate::error::Result;
use crate::port::StackBackend;

/// Drives one stack through create/update until it settles.
#[derive(Clone)]
pub struct StackDriver {
    stacks: Arc<dyn StackBackend>,
}

impl StackDriver {
    pub fn new(stacks: Arc<dyn StackBackend>) -> Self {
        Self { stacks }
    }

    /// Run one step for `state`. `template` is only needed, and only read,
    /// when nothing has been requested yet.
    pub async fn step<F>(
        &self,
        job_id: &JobId,
        state: &JobState,
        stack: &StackName,
        template: F,
        now: DateTime<Utc>,
    ) -> Result<Outcome>
    where
        F: FnOnce() -> Result<String>,
    {
        match state {
            JobState::NotStarted => self.start(job_id, stack, &template()?, now).await,
            JobState::Polling { .. } => self.poll(job_id, state, stack, now).await,
        }
    }

    /// Request the create or update and hand control back immediately.
    pub async fn start(
        &self,
        job_id: &JobId,
        stack: &StackName,
        template: &str,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        match self.stacks.stack_status(stack).await? {
            None => {
                info!(job_id = %job_id, stack = %stack, "Creating stack");
                self.stacks.create_stack(stack, template).await?;
            }
            Some(status) => {
                info!(job_id = %job_id, stack = %stack, status = %status, "Updating stack");
                self.stacks.update_stack(stack, template).await?;
            }
        }

        Ok(Outcome::continue_with(
            JobState::NotStarted.advance(job_id, now),
            format!("Stack {stack} create/update started"),
        ))
    }

    /// Read the stack status and decide the outcome. Never mutates.
    pub async fn poll(
        &self,
        job_id: &JobId,
        state: &JobState,
        stack: &StackName,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        let Some(status) = self.stacks.stack_status(stack).await? else {
            warn!(job_id = %job_id, stack = %stack, "Stack disappeared while polling");
            return Ok(Outcome::failed(FailureDetails::job_failed(format!(
                "Stack {stack} does not exist"
            ))));
        };

        info!(
            job_id = %job_id,
            stack = %stack,
            status = %status,
            attempt = state.attempt(),
            "Polled stack status"
        );

        let outcome = match status.phase() {
            StackPhase::Succeeded => Outcome::succeeded(format!("Stack {stack} reached {status}")),
            StackPhase::InProgress => Outcome::continue_with(
                state.advance(job_id, now),
                format!("Stack {stack} still in progress: {status}"),
            ),
            StackPhase::Failed => Outcome::failed(FailureDetails::job_failed(format!(
                "Stack {stack} update failed: {status}"
            ))),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fakes::{FakeStackBackend, StackMutation};

    fn stack() -> StackName {
        StackName::derive("app", &crate::domain::BuildId::from_marker("b42").unwrap()).unwrap()
    }

    fn polling(job: &JobId) -> JobState {
        JobState::NotStarted.advance(job, Utc::now())
    }

    #[tokio::test]
    async fn fresh_job_creates_once_and_continues() {
        let backend = Arc::new(FakeStackBackend::new());
        let driver = StackDriver::new(backend.clone());
        let job = JobId::from("job-1");

        let outcome = driver
            .start(&job, &stack(), "{}", Utc::now())
            .await
            .unwrap();

        assert!(outcome.is_continuation());
        assert_eq!(
            backend.mutations(),
            vec![StackMutation::Create {
                stack: "app-b42".into(),
                template: "{}".into()
            }]
        );
    }

    #[tokio::test]
    async fn existing_stack_is_updated() {
        let backend = Arc::new(FakeStackBackend::new());
        backend.set_status("app-b42", "CREATE_COMPLETE");
        let driver = StackDriver::new(backend.clone());

        driver
            .start(&JobId::from("job-1"), &stack(), "{}", Utc::now())
            .await
            .unwrap();

        assert!(matches!(
            backend.mutations().as_slice(),
            [StackMutation::Update { .. }]
        ));
    }

    #[tokio::test]
    async fn template_is_not_read_when_polling() {
        let backend = Arc::new(FakeStackBackend::new());
        backend.set_status("app-b42", "CREATE_IN_PROGRESS");
        let driver = StackDriver::new(backend.clone());
        let job = JobId::from("job-2");

        let outcome = driver
            .step(
                &job,
                &polling(&JobId::from("job-1")),
                &stack(),
                || panic!("template read while polling"),
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(outcome.is_continuation());
        assert!(backend.mutations().is_empty());
    }

    #[tokio::test]
    async fn failure_message_carries_raw_status() {
        let backend = Arc::new(FakeStackBackend::new());
        backend.set_status("app-b42", "ROLLBACK_COMPLETE");
        let driver = StackDriver::new(backend.clone());
        let job = JobId::from("job-2");

        let outcome = driver
            .poll(&job, &polling(&job), &stack(), Utc::now())
            .await
            .unwrap();

        match outcome {
            Outcome::Failed(details) => assert!(details.message.contains("ROLLBACK_COMPLETE")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_stack_while_polling_fails() {
        let backend = Arc::new(FakeStackBackend::new());
        let driver = StackDriver::new(backend);
        let job = JobId::from("job-2");

        let outcome = driver
            .poll(&job, &polling(&job), &stack(), Utc::now())
            .await
            .unwrap();
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn unknown_status_fails() {
        let backend = Arc::new(FakeStackBackend::new());
        backend.set_status("app-b42", "SOMETHING_NEW");
        let driver = StackDriver::new(backend);
        let job = JobId::from("job-2");

        let outcome = driver
            .poll(&job, &polling(&job), &stack(), Utc::now())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::failed(FailureDetails::job_failed(
                "Stack app-b42 update failed: SOMETHING_NEW"
            ))
        );
    }
}

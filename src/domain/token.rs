//! Continuation tokens and the resumable job state they carry.
//!
//! The orchestrator bounds how long one invocation may run, so a job that
//! waits on remote work hands back a token and is invoked again later with
//! that token. The token is the only state that survives between
//! invocations. It references jobs and counts attempts; it never carries
//! stack names, templates, or anything else the handler acts on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::JobId;
use crate::error::TokenError;

/// Resumable job state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    /// No remote work has been requested yet.
    NotStarted,
    /// Remote work was requested; every further invocation only polls.
    Polling {
        /// Job that issued the create/update request.
        origin_job_id: JobId,
        /// Job that emitted this token.
        previous_job_id: JobId,
        /// Number of continuations issued so far, starting at 1.
        attempt: u32,
        started_at: DateTime<Utc>,
    },
}

impl JobState {
    /// Decode the state carried by an invocation.
    ///
    /// A missing token means a fresh job. A present token must decode to a
    /// polling state.
    pub fn resume(token: Option<&str>) -> Result<Self, TokenError> {
        let Some(token) = token else {
            return Ok(JobState::NotStarted);
        };
        let state = ContinuationToken::new(token).decode()?;
        match state {
            JobState::NotStarted => Err(TokenError::NotResumable),
            polling => Ok(polling),
        }
    }

    /// State to hand back when the current invocation `job_id` continues.
    #[must_use]
    pub fn advance(&self, job_id: &JobId, now: DateTime<Utc>) -> JobState {
        match self {
            JobState::NotStarted => JobState::Polling {
                origin_job_id: job_id.clone(),
                previous_job_id: job_id.clone(),
                attempt: 1,
                started_at: now,
            },
            JobState::Polling {
                origin_job_id,
                attempt,
                started_at,
                ..
            } => JobState::Polling {
                origin_job_id: origin_job_id.clone(),
                previous_job_id: job_id.clone(),
                attempt: attempt.saturating_add(1),
                started_at: *started_at,
            },
        }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        matches!(self, JobState::Polling { .. })
    }

    /// Continuations issued so far.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        match self {
            JobState::NotStarted => 0,
            JobState::Polling { attempt, .. } => *attempt,
        }
    }
}

/// Opaque token text exchanged with the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Serialize a job state into a token.
    pub fn encode(state: &JobState) -> Result<Self, serde_json::Error> {
        serde_json::to_string(state).map(Self)
    }

    pub fn decode(&self) -> Result<JobState, TokenError> {
        if self.0.trim().is_empty() {
            return Err(TokenError::Empty);
        }
        serde_json::from_str(&self.0).map_err(TokenError::Malformed)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_token_is_not_started() {
        assert_eq!(JobState::resume(None).unwrap(), JobState::NotStarted);
    }

    #[test]
    fn first_advance_references_originating_job() {
        let job = JobId::from("job-1");
        let state = JobState::NotStarted.advance(&job, now());
        let token = ContinuationToken::encode(&state).unwrap();

        assert!(token.as_str().contains("job-1"));
        let resumed = JobState::resume(Some(token.as_str())).unwrap();
        assert_eq!(resumed, state);
        assert_eq!(resumed.attempt(), 1);
    }

    #[test]
    fn later_advances_keep_origin_and_count_attempts() {
        let first = JobState::NotStarted.advance(&JobId::from("job-1"), now());
        let second = first.advance(&JobId::from("job-2"), now() + chrono::Duration::minutes(1));

        match second {
            JobState::Polling {
                origin_job_id,
                previous_job_id,
                attempt,
                started_at,
            } => {
                assert_eq!(origin_job_id.as_str(), "job-1");
                assert_eq!(previous_job_id.as_str(), "job-2");
                assert_eq!(attempt, 2);
                assert_eq!(started_at, now());
            }
            JobState::NotStarted => panic!("expected polling state"),
        }
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            JobState::resume(Some("not json")),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(JobState::resume(Some("  ")), Err(TokenError::Empty)));
    }

    #[test]
    fn not_started_token_is_not_resumable() {
        let token = ContinuationToken::encode(&JobState::NotStarted).unwrap();
        assert!(matches!(
            JobState::resume(Some(token.as_str())),
            Err(TokenError::NotResumable)
        ));
    }
}

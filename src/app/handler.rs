//! Entry points invoked once per job attempt.
//!
//! Every entry point runs its whole body behind one boundary: any error,
//! or a panic, becomes a single failure report to the orchestrator before
//! the invocation ends. Only when that failure report itself cannot be
//! delivered does an error reach the host.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::artifact::ArtifactReader;
use super::backends::Backends;
use super::fleet::{FleetAttacher, FleetHealthWaiter, FleetPair};
use super::reporter::JobReporter;
use super::resolver::{self, ResolvedJob};
use super::stack::StackDriver;
use crate::adapter::inbound::{decode_event, event_job_id};
use crate::config::Config;
use crate::domain::parameters::keys;
use crate::domain::{FailureDetails, JobId, JobInvocation, Outcome};
use crate::error::{ConfigError, Error, Result};

/// The three pipeline actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create or update a stack and wait for it to settle.
    DeployStack,
    /// Attach a fleet to its balancer.
    AttachFleet,
    /// Wait until every fleet member is healthy behind the balancer.
    AwaitFleetHealth,
}

impl Action {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::DeployStack => "deploy-stack",
            Action::AttachFleet => "attach-fleet",
            Action::AwaitFleetHealth => "await-fleet-health",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "deploy-stack" => Ok(Action::DeployStack),
            "attach-fleet" => Ok(Action::AttachFleet),
            "await-fleet-health" => Ok(Action::AwaitFleetHealth),
            other => Err(ConfigError::InvalidValue {
                field: "action",
                reason: format!("unknown action '{other}'"),
            }),
        }
    }
}

/// Handler set shared by every invocation in a host process.
#[derive(Clone)]
pub struct Handlers {
    backends: Backends,
    config: Arc<Config>,
    reporter: JobReporter,
}

impl Handlers {
    pub fn new(backends: Backends, config: Config) -> Self {
        let reporter = JobReporter::new(
            backends.jobs.clone(),
            config.reporting.max_message_chars,
        );
        Self {
            backends,
            config: Arc::new(config),
            reporter,
        }
    }

    /// Create/update the stack named by `stack_prefix` and the build id.
    pub async fn deploy_stack(&self, job: &JobInvocation) -> Result<Outcome> {
        self.handle(Action::DeployStack, job).await
    }

    /// Attach the `asg_stack_prefix` fleet to the `elb_stack_prefix` balancer.
    pub async fn attach_fleet(&self, job: &JobInvocation) -> Result<Outcome> {
        self.handle(Action::AttachFleet, job).await
    }

    /// Wait for every fleet member to be healthy behind the balancer.
    pub async fn await_fleet_health(&self, job: &JobInvocation) -> Result<Outcome> {
        self.handle(Action::AwaitFleetHealth, job).await
    }

    /// Run `action` for one job attempt and report its outcome.
    ///
    /// Returns the outcome that was reported. `Err` means even the failure
    /// report could not be delivered.
    pub async fn handle(&self, action: Action, job: &JobInvocation) -> Result<Outcome> {
        info!(
            job_id = %job.id,
            action = %action,
            continuation = job.is_continuation(),
            "Handling job"
        );

        let this = self.clone();
        let owned = job.clone();
        let result = match tokio::spawn(async move { this.run(action, &owned).await }).await {
            Ok(result) => result,
            Err(join) => Err(Error::Internal(panic_message(join))),
        };

        match result {
            Ok(outcome) => {
                info!(job_id = %job.id, action = %action, "Function complete");
                Ok(outcome)
            }
            Err(err) => self.fail_job(&job.id, action, &err).await,
        }
    }

    /// Decode a raw invocation event and run `action` for it.
    ///
    /// An event that names its job but does not decode is failed against
    /// that job. Without a job id there is nothing to report against, so the
    /// decode error is returned to the host.
    pub async fn handle_event(&self, action: Action, event: serde_json::Value) -> Result<Outcome> {
        let job_id = event_job_id(&event);
        match decode_event(event) {
            Ok(job) => self.handle(action, &job).await,
            Err(err) => match job_id {
                Some(job_id) => self.fail_job(&job_id, action, &err).await,
                None => {
                    error!(action = %action, error = %err, "Event has no job id");
                    Err(err)
                }
            },
        }
    }

    async fn fail_job(&self, job_id: &JobId, action: Action, err: &Error) -> Result<Outcome> {
        error!(job_id = %job_id, action = %action, error = %err, "Function failed");
        let details = FailureDetails::new(err.failure_kind(), format!("Function exception: {err}"))
            .truncated(self.config.reporting.max_message_chars);
        self.reporter.fail(job_id, details.clone()).await?;
        Ok(Outcome::failed(details))
    }

    async fn run(&self, action: Action, job: &JobInvocation) -> Result<Outcome> {
        let resolved = resolver::resolve(job)?;
        let outcome = match action {
            Action::DeployStack => self.run_deploy_stack(job, &resolved).await?,
            Action::AttachFleet => self.run_attach_fleet(job, &resolved).await?,
            Action::AwaitFleetHealth => self.run_await_fleet_health(job, &resolved).await?,
        };
        let outcome = match outcome {
            Outcome::Failed(details) => {
                Outcome::Failed(details.truncated(self.config.reporting.max_message_chars))
            }
            other => other,
        };
        self.reporter.report(&job.id, &outcome).await?;
        Ok(outcome)
    }

    async fn run_deploy_stack(&self, job: &JobInvocation, resolved: &ResolvedJob) -> Result<Outcome> {
        let reader = self.open_artifact(job, resolved).await?;
        let build = resolver::build_id(&reader, &self.config.artifact.marker_entry)?;
        let stack = resolver::stack_name(&resolved.params, keys::STACK_PREFIX, &build)?;

        StackDriver::new(self.backends.stacks.clone())
            .step(
                &job.id,
                &resolved.state,
                &stack,
                || reader.read_text(resolved.params.require(keys::TEMPLATE)?),
                Utc::now(),
            )
            .await
    }

    async fn run_attach_fleet(&self, job: &JobInvocation, resolved: &ResolvedJob) -> Result<Outcome> {
        let pair = self.resolve_fleet_pair(job, resolved).await?;
        FleetAttacher::new(self.backends.fleets.clone())
            .attach(&job.id, &pair)
            .await
    }

    async fn run_await_fleet_health(
        &self,
        job: &JobInvocation,
        resolved: &ResolvedJob,
    ) -> Result<Outcome> {
        let pair = self.resolve_fleet_pair(job, resolved).await?;
        FleetHealthWaiter::new(
            self.backends.fleets.clone(),
            self.backends.balancers.clone(),
            self.config.fleet.healthy_state.clone(),
        )
        .check(&job.id, &resolved.state, &pair, Utc::now())
        .await
    }

    async fn open_artifact(&self, job: &JobInvocation, resolved: &ResolvedJob) -> Result<ArtifactReader> {
        let name = resolved.params.require(keys::ARTIFACT)?;
        ArtifactReader::open(
            self.backends.artifacts.as_ref(),
            self.backends.packages.clone(),
            job,
            name,
        )
        .await
    }

    async fn resolve_fleet_pair(&self, job: &JobInvocation, resolved: &ResolvedJob) -> Result<FleetPair> {
        let reader = self.open_artifact(job, resolved).await?;
        let build = resolver::build_id(&reader, &self.config.artifact.marker_entry)?;
        let fleet_stack = resolver::stack_name(&resolved.params, keys::ASG_STACK_PREFIX, &build)?;
        let balancer_stack =
            resolver::stack_name(&resolved.params, keys::ELB_STACK_PREFIX, &build)?;
        FleetPair::resolve(
            self.backends.stacks.as_ref(),
            &self.config.fleet,
            &fleet_stack,
            &balancer_stack,
        )
        .await
    }
}

fn panic_message(join: tokio::task::JoinError) -> String {
    if join.is_cancelled() {
        return "task cancelled".to_string();
    }
    let payload = join.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

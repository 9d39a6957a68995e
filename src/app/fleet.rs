//! Fleet attachment and fleet health waiting.
//!
//! Both workflows first resolve the same pair of physical resources: the
//! fleet manager declared in the fleet stack and the balancer declared in
//! the balancer stack.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::FleetConfig;
use crate::domain::{FleetHealth, JobId, JobState, Outcome, PhysicalResourceId, StackName};
use crate::error::{Error, Result};
use crate::port::{BalancerBackend, FleetBackend, StackBackend};

/// Physical ids of a fleet and the balancer it belongs behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetPair {
    pub fleet: PhysicalResourceId,
    pub balancer: PhysicalResourceId,
}

impl FleetPair {
    /// Look up both resources by their logical ids.
    pub async fn resolve(
        stacks: &dyn StackBackend,
        config: &FleetConfig,
        fleet_stack: &StackName,
        balancer_stack: &StackName,
    ) -> Result<Self> {
        let fleet = physical_id(stacks, fleet_stack, &config.fleet_logical_id).await?;
        let balancer = physical_id(stacks, balancer_stack, &config.balancer_logical_id).await?;
        debug!(fleet = %fleet, balancer = %balancer, "Resolved fleet resources");
        Ok(Self { fleet, balancer })
    }
}

async fn physical_id(
    stacks: &dyn StackBackend,
    stack: &StackName,
    logical_id: &str,
) -> Result<PhysicalResourceId> {
    stacks
        .physical_resource_id(stack, logical_id)
        .await?
        .ok_or_else(|| Error::ResourceNotFound {
            stack: stack.to_string(),
            logical_id: logical_id.to_string(),
        })
}

/// Single-shot: binds the balancer to the fleet manager.
#[derive(Clone)]
pub struct FleetAttacher {
    fleets: Arc<dyn FleetBackend>,
}

impl FleetAttacher {
    pub fn new(fleets: Arc<dyn FleetBackend>) -> Self {
        Self { fleets }
    }

    pub async fn attach(&self, job_id: &JobId, pair: &FleetPair) -> Result<Outcome> {
        info!(
            job_id = %job_id,
            fleet = %pair.fleet,
            balancer = %pair.balancer,
            "Attaching fleet to balancer"
        );
        self.fleets.attach_balancer(&pair.fleet, &pair.balancer).await?;
        Ok(Outcome::succeeded(format!(
            "Fleet {} attached to balancer {}",
            pair.fleet, pair.balancer
        )))
    }
}

/// Checks whether every fleet member is healthy behind the balancer,
/// continuing the job until it is.
#[derive(Clone)]
pub struct FleetHealthWaiter {
    fleets: Arc<dyn FleetBackend>,
    balancers: Arc<dyn BalancerBackend>,
    healthy_state: String,
}

impl FleetHealthWaiter {
    pub fn new(
        fleets: Arc<dyn FleetBackend>,
        balancers: Arc<dyn BalancerBackend>,
        healthy_state: impl Into<String>,
    ) -> Self {
        Self {
            fleets,
            balancers,
            healthy_state: healthy_state.into(),
        }
    }

    /// One health check. Reads only, so repeated continuations are safe.
    pub async fn check(
        &self,
        job_id: &JobId,
        state: &JobState,
        pair: &FleetPair,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        let members = self.fleets.fleet_members(&pair.fleet).await?;
        let reported = if members.is_empty() {
            Vec::new()
        } else {
            self.balancers.member_health(&pair.balancer, &members).await?
        };
        let health = FleetHealth::evaluate(&members, &reported, &self.healthy_state);

        info!(
            job_id = %job_id,
            fleet = %pair.fleet,
            healthy = health.healthy(),
            total = health.total(),
            attempt = state.attempt(),
            "Checked fleet health"
        );

        if health.is_converged() {
            return Ok(Outcome::succeeded(format!(
                "All {} members of {} are {} behind {}",
                health.total(),
                pair.fleet,
                self.healthy_state,
                pair.balancer
            )));
        }

        for member in health.pending() {
            debug!(instance = %member.instance_id, state = %member.state, "Member not yet healthy");
        }
        Ok(Outcome::continue_with(
            state.advance(job_id, now),
            format!(
                "{}/{} members of {} are {}",
                health.healthy(),
                health.total(),
                pair.fleet,
                self.healthy_state
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildId;
    use crate::testkit::fakes::{FakeBalancerBackend, FakeFleetBackend, FakeStackBackend};

    fn stacks() -> (StackName, StackName) {
        let build = BuildId::from_marker("7").unwrap();
        (
            StackName::derive("web", &build).unwrap(),
            StackName::derive("lb", &build).unwrap(),
        )
    }

    fn pair() -> FleetPair {
        FleetPair {
            fleet: PhysicalResourceId::from("web-asg"),
            balancer: PhysicalResourceId::from("web-elb"),
        }
    }

    #[tokio::test]
    async fn resolves_pair_from_logical_ids() {
        let backend = FakeStackBackend::new();
        backend.set_resource("web-7", "WebAutoScalingGroup", "web-asg");
        backend.set_resource("lb-7", "ELB", "web-elb");
        let (fleet_stack, balancer_stack) = stacks();

        let resolved =
            FleetPair::resolve(&backend, &FleetConfig::default(), &fleet_stack, &balancer_stack)
                .await
                .unwrap();
        assert_eq!(resolved, pair());
    }

    #[tokio::test]
    async fn missing_resource_is_an_error() {
        let backend = FakeStackBackend::new();
        backend.set_resource("web-7", "WebAutoScalingGroup", "web-asg");
        let (fleet_stack, balancer_stack) = stacks();

        let result =
            FleetPair::resolve(&backend, &FleetConfig::default(), &fleet_stack, &balancer_stack)
                .await;
        assert!(matches!(
            result,
            Err(Error::ResourceNotFound { logical_id, .. }) if logical_id == "ELB"
        ));
    }

    #[tokio::test]
    async fn attach_binds_balancer_and_succeeds() {
        let fleets = Arc::new(FakeFleetBackend::new());
        let attacher = FleetAttacher::new(fleets.clone());

        let outcome = attacher.attach(&JobId::from("job-1"), &pair()).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(
            fleets.attachments(),
            vec![(pair().fleet, pair().balancer)]
        );
    }

    #[tokio::test]
    async fn partial_health_continues() {
        let fleets = Arc::new(FakeFleetBackend::new());
        fleets.set_members("web-asg", &["i-1", "i-2", "i-3"]);
        let balancers = Arc::new(FakeBalancerBackend::new());
        balancers.set_health("web-elb", "i-1", "InService");
        balancers.set_health("web-elb", "i-2", "OutOfService");
        balancers.set_health("web-elb", "i-3", "InService");
        let waiter = FleetHealthWaiter::new(fleets, balancers, "InService");
        let job = JobId::from("job-1");

        let outcome = waiter
            .check(&job, &JobState::NotStarted, &pair(), Utc::now())
            .await
            .unwrap();

        assert!(outcome.is_continuation());
    }

    #[tokio::test]
    async fn full_health_succeeds() {
        let fleets = Arc::new(FakeFleetBackend::new());
        fleets.set_members("web-asg", &["i-1", "i-2"]);
        let balancers = Arc::new(FakeBalancerBackend::new());
        balancers.set_health("web-elb", "i-1", "InService");
        balancers.set_health("web-elb", "i-2", "InService");
        let waiter = FleetHealthWaiter::new(fleets, balancers, "InService");

        let outcome = waiter
            .check(&JobId::from("job-1"), &JobState::NotStarted, &pair(), Utc::now())
            .await
            .unwrap();

        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn empty_fleet_skips_balancer_and_continues() {
        let fleets = Arc::new(FakeFleetBackend::new());
        fleets.set_members("web-asg", &[]);
        let balancers = Arc::new(FakeBalancerBackend::new());
        let waiter = FleetHealthWaiter::new(fleets, balancers.clone(), "InService");

        let outcome = waiter
            .check(&JobId::from("job-1"), &JobState::NotStarted, &pair(), Utc::now())
            .await
            .unwrap();

        assert!(outcome.is_continuation());
        assert_eq!(balancers.query_count(), 0);
    }
}

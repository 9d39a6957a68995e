//! Fleet and balancer ports.

use async_trait::async_trait;

use crate::domain::{InstanceId, MemberHealth, PhysicalResourceId};
use crate::error::BackendError;

/// Fleet manager (auto-scaling group) operations.
#[async_trait]
pub trait FleetBackend: Send + Sync {
    /// Instances currently in the fleet.
    async fn fleet_members(&self, fleet: &PhysicalResourceId)
        -> Result<Vec<InstanceId>, BackendError>;

    /// Register the fleet behind `balancer`.
    async fn attach_balancer(
        &self,
        fleet: &PhysicalResourceId,
        balancer: &PhysicalResourceId,
    ) -> Result<(), BackendError>;
}

/// Balancer health operations.
#[async_trait]
pub trait BalancerBackend: Send + Sync {
    /// Health state of each of `members` as seen by `balancer`.
    async fn member_health(
        &self,
        balancer: &PhysicalResourceId,
        members: &[InstanceId],
    ) -> Result<Vec<MemberHealth>, BackendError>;
}

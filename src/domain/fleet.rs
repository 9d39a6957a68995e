//! Fleet membership and balancer health.

use super::id::InstanceId;

/// Balancer-reported state of one fleet member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHealth {
    pub instance_id: InstanceId,
    pub state: String,
}

impl MemberHealth {
    pub fn new(instance_id: impl Into<InstanceId>, state: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            state: state.into(),
        }
    }
}

/// Summary of how far a fleet has converged behind its balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetHealth {
    total: usize,
    pending: Vec<MemberHealth>,
}

impl FleetHealth {
    /// Compare fleet members against the balancer's view of them.
    ///
    /// A member counts as healthy only if the balancer reports exactly
    /// `healthy_state` for it. Members the balancer does not mention are
    /// reported as `Unregistered`.
    #[must_use]
    pub fn evaluate(members: &[InstanceId], health: &[MemberHealth], healthy_state: &str) -> Self {
        let pending = members
            .iter()
            .filter_map(|member| {
                match health.iter().find(|h| &h.instance_id == member) {
                    Some(h) if h.state == healthy_state => None,
                    Some(h) => Some(h.clone()),
                    None => Some(MemberHealth::new(member.clone(), "Unregistered")),
                }
            })
            .collect();
        Self {
            total: members.len(),
            pending,
        }
    }

    /// True when the fleet has members and every one of them is healthy.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.total > 0 && self.pending.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn healthy(&self) -> usize {
        self.total - self.pending.len()
    }

    /// Members that are not yet healthy, with their reported state.
    #[must_use]
    pub fn pending(&self) -> &[MemberHealth] {
        &self.pending
    }
}

//! Backend client handles injected into the handlers.

use std::sync::Arc;

use crate::port::{
    ArtifactStore, BalancerBackend, FleetBackend, JobResultApi, PackageReader, StackBackend,
};

/// One handle per remote system.
///
/// The host builds these once and may reuse them across invocations; none
/// of them carries invocation-specific state.
#[derive(Clone)]
pub struct Backends {
    pub jobs: Arc<dyn JobResultApi>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub packages: Arc<dyn PackageReader>,
    pub stacks: Arc<dyn StackBackend>,
    pub fleets: Arc<dyn FleetBackend>,
    pub balancers: Arc<dyn BalancerBackend>,
}

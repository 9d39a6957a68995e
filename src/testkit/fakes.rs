//! In-memory port implementations.
//!
//! Every fake records the calls made against it so tests can assert on
//! reports and mutations, not just on returned outcomes.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::app::Backends;
use crate::domain::{
    ArtifactCredentials, ArtifactLocation, ContinuationToken, FailureDetails, InstanceId, JobId,
    MemberHealth, PhysicalResourceId, StackName, StackStatus,
};
use crate::error::{ArtifactError, BackendError};
use crate::port::{
    ArtifactStore, BalancerBackend, FleetBackend, JobResultApi, PackageReader, StackBackend,
};

/// One result sent to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedResult {
    Success(JobId),
    Continuation(JobId, ContinuationToken),
    Failure(JobId, FailureDetails),
}

/// Job result API that records every report.
#[derive(Default)]
pub struct RecordingJobApi {
    results: Mutex<Vec<ReportedResult>>,
    failing: AtomicBool,
}

impl RecordingJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent report fail.
    pub fn fail_reports(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn results(&self) -> Vec<ReportedResult> {
        self.results.lock().clone()
    }

    fn record(&self, result: ReportedResult) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::new("pipeline", "put-job-result", "unavailable"));
        }
        self.results.lock().push(result);
        Ok(())
    }
}

#[async_trait]
impl JobResultApi for RecordingJobApi {
    async fn put_success(&self, job_id: &JobId) -> Result<(), BackendError> {
        self.record(ReportedResult::Success(job_id.clone()))
    }

    async fn put_continuation(
        &self,
        job_id: &JobId,
        token: &ContinuationToken,
    ) -> Result<(), BackendError> {
        self.record(ReportedResult::Continuation(job_id.clone(), token.clone()))
    }

    async fn put_failure(
        &self,
        job_id: &JobId,
        failure: &FailureDetails,
    ) -> Result<(), BackendError> {
        self.record(ReportedResult::Failure(job_id.clone(), failure.clone()))
    }
}

/// Builder for an artifact package stored by [`InMemoryArtifactStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPackage {
    entries: BTreeMap<String, Vec<u8>>,
}

impl InMemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(self, name: &str, contents: &str) -> Self {
        self.entry_bytes(name, contents.as_bytes().to_vec())
    }

    pub fn entry_bytes(mut self, name: &str, contents: Vec<u8>) -> Self {
        self.entries.insert(name.to_string(), contents);
        self
    }

    fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(&self.entries).unwrap_or_default()
    }
}

/// Reads packages produced by [`InMemoryPackage`].
pub struct InMemoryPackageReader;

impl PackageReader for InMemoryPackageReader {
    fn read_entry(&self, package: &[u8], entry: &str) -> Result<Vec<u8>, ArtifactError> {
        let entries: BTreeMap<String, Vec<u8>> = serde_json::from_slice(package)
            .map_err(|e| ArtifactError::Package(e.to_string()))?;
        entries
            .get(entry)
            .cloned()
            .ok_or_else(|| ArtifactError::EntryNotFound {
                entry: entry.to_string(),
            })
    }
}

/// Object store keyed by bucket and key.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    fetches: AtomicUsize,
    last_credentials: Mutex<Option<ArtifactCredentials>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, package: InMemoryPackage) {
        self.objects
            .lock()
            .insert((bucket.to_string(), key.to_string()), package.encode());
    }

    /// The package reader matching this store's encoding.
    pub fn reader(&self) -> Arc<dyn PackageReader> {
        Arc::new(InMemoryPackageReader)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Credentials passed to the most recent fetch.
    pub fn last_credentials(&self) -> Option<ArtifactCredentials> {
        self.last_credentials.lock().clone()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn fetch(
        &self,
        credentials: &ArtifactCredentials,
        location: &ArtifactLocation,
    ) -> Result<Vec<u8>, ArtifactError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_credentials.lock() = Some(credentials.clone());
        self.objects
            .lock()
            .get(&(location.bucket.clone(), location.key.clone()))
            .cloned()
            .ok_or_else(|| ArtifactError::FetchFailed {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
                reason: "NoSuchKey".to_string(),
            })
    }
}

/// A create or update request seen by [`FakeStackBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackMutation {
    Create { stack: String, template: String },
    Update { stack: String, template: String },
}

/// Provisioning backend holding stack statuses and resources in memory.
///
/// Creates move a stack to `CREATE_IN_PROGRESS`, updates to
/// `UPDATE_IN_PROGRESS`; tests advance statuses with [`Self::set_status`].
#[derive(Default)]
pub struct FakeStackBackend {
    statuses: Mutex<HashMap<String, StackStatus>>,
    resources: Mutex<HashMap<(String, String), PhysicalResourceId>>,
    mutations: Mutex<Vec<StackMutation>>,
    status_reads: AtomicUsize,
    failing_mutations: AtomicBool,
}

impl FakeStackBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, stack: &str, status: &str) {
        self.statuses
            .lock()
            .insert(stack.to_string(), StackStatus::parse(status));
    }

    pub fn set_resource(&self, stack: &str, logical_id: &str, physical_id: &str) {
        self.resources.lock().insert(
            (stack.to_string(), logical_id.to_string()),
            PhysicalResourceId::from(physical_id),
        );
    }

    /// Make create and update requests fail.
    pub fn fail_mutations(&self, failing: bool) {
        self.failing_mutations.store(failing, Ordering::SeqCst);
    }

    pub fn mutations(&self) -> Vec<StackMutation> {
        self.mutations.lock().clone()
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }

    fn check_failing(&self, operation: &'static str) -> Result<(), BackendError> {
        if self.failing_mutations.load(Ordering::SeqCst) {
            return Err(BackendError::new("provisioning", operation, "throttled"));
        }
        Ok(())
    }
}

#[async_trait]
impl StackBackend for FakeStackBackend {
    async fn stack_status(&self, stack: &StackName) -> Result<Option<StackStatus>, BackendError> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.statuses.lock().get(stack.as_str()).cloned())
    }

    async fn create_stack(&self, stack: &StackName, template: &str) -> Result<(), BackendError> {
        self.check_failing("create-stack")?;
        let mut statuses = self.statuses.lock();
        if statuses.contains_key(stack.as_str()) {
            return Err(BackendError::new(
                "provisioning",
                "create-stack",
                format!("stack {stack} already exists"),
            ));
        }
        statuses.insert(stack.to_string(), StackStatus::CreateInProgress);
        self.mutations.lock().push(StackMutation::Create {
            stack: stack.to_string(),
            template: template.to_string(),
        });
        Ok(())
    }

    async fn update_stack(&self, stack: &StackName, template: &str) -> Result<(), BackendError> {
        self.check_failing("update-stack")?;
        let mut statuses = self.statuses.lock();
        if !statuses.contains_key(stack.as_str()) {
            return Err(BackendError::new(
                "provisioning",
                "update-stack",
                format!("stack {stack} does not exist"),
            ));
        }
        statuses.insert(stack.to_string(), StackStatus::UpdateInProgress);
        self.mutations.lock().push(StackMutation::Update {
            stack: stack.to_string(),
            template: template.to_string(),
        });
        Ok(())
    }

    async fn physical_resource_id(
        &self,
        stack: &StackName,
        logical_id: &str,
    ) -> Result<Option<PhysicalResourceId>, BackendError> {
        Ok(self
            .resources
            .lock()
            .get(&(stack.to_string(), logical_id.to_string()))
            .cloned())
    }
}

/// Fleet backend with configurable membership.
#[derive(Default)]
pub struct FakeFleetBackend {
    members: Mutex<HashMap<String, Vec<InstanceId>>>,
    attachments: Mutex<Vec<(PhysicalResourceId, PhysicalResourceId)>>,
}

impl FakeFleetBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_members(&self, fleet: &str, members: &[&str]) {
        self.members.lock().insert(
            fleet.to_string(),
            members.iter().map(|id| InstanceId::from(*id)).collect(),
        );
    }

    /// `(fleet, balancer)` pairs attached so far.
    pub fn attachments(&self) -> Vec<(PhysicalResourceId, PhysicalResourceId)> {
        self.attachments.lock().clone()
    }
}

#[async_trait]
impl FleetBackend for FakeFleetBackend {
    async fn fleet_members(
        &self,
        fleet: &PhysicalResourceId,
    ) -> Result<Vec<InstanceId>, BackendError> {
        self.members
            .lock()
            .get(fleet.as_str())
            .cloned()
            .ok_or_else(|| {
                BackendError::new("fleet", "describe-fleet", format!("no fleet named {fleet}"))
            })
    }

    async fn attach_balancer(
        &self,
        fleet: &PhysicalResourceId,
        balancer: &PhysicalResourceId,
    ) -> Result<(), BackendError> {
        self.attachments
            .lock()
            .push((fleet.clone(), balancer.clone()));
        Ok(())
    }
}

/// Balancer backend with configurable per-member state.
#[derive(Default)]
pub struct FakeBalancerBackend {
    health: Mutex<HashMap<String, Vec<MemberHealth>>>,
    queries: AtomicUsize,
}

impl FakeBalancerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_health(&self, balancer: &str, instance: &str, state: &str) {
        let mut health = self.health.lock();
        let members = health.entry(balancer.to_string()).or_default();
        members.retain(|m| m.instance_id.as_str() != instance);
        members.push(MemberHealth::new(instance, state));
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalancerBackend for FakeBalancerBackend {
    async fn member_health(
        &self,
        balancer: &PhysicalResourceId,
        members: &[InstanceId],
    ) -> Result<Vec<MemberHealth>, BackendError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let health = self.health.lock();
        let known = health.get(balancer.as_str()).cloned().unwrap_or_default();
        Ok(known
            .into_iter()
            .filter(|m| members.contains(&m.instance_id))
            .collect())
    }
}

/// Every fake wired together, with the [`Backends`] bundle built from them.
#[derive(Clone)]
pub struct FakeBackends {
    pub jobs: Arc<RecordingJobApi>,
    pub artifacts: Arc<InMemoryArtifactStore>,
    pub stacks: Arc<FakeStackBackend>,
    pub fleets: Arc<FakeFleetBackend>,
    pub balancers: Arc<FakeBalancerBackend>,
}

impl FakeBackends {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RecordingJobApi::new()),
            artifacts: Arc::new(InMemoryArtifactStore::new()),
            stacks: Arc::new(FakeStackBackend::new()),
            fleets: Arc::new(FakeFleetBackend::new()),
            balancers: Arc::new(FakeBalancerBackend::new()),
        }
    }

    pub fn backends(&self) -> Backends {
        Backends {
            jobs: self.jobs.clone(),
            artifacts: self.artifacts.clone(),
            packages: self.artifacts.reader(),
            stacks: self.stacks.clone(),
            fleets: self.fleets.clone(),
            balancers: self.balancers.clone(),
        }
    }
}

impl Default for FakeBackends {
    fn default() -> Self {
        Self::new()
    }
}

//! Provisioning backend port.

use async_trait::async_trait;

use crate::domain::{PhysicalResourceId, StackName, StackStatus};
use crate::error::BackendError;

/// Stack lifecycle operations of the infrastructure-provisioning backend.
#[async_trait]
pub trait StackBackend: Send + Sync {
    /// Current status of `stack`, or `None` if it does not exist.
    async fn stack_status(&self, stack: &StackName) -> Result<Option<StackStatus>, BackendError>;

    /// Start creating `stack` from `template`.
    async fn create_stack(&self, stack: &StackName, template: &str) -> Result<(), BackendError>;

    /// Start updating `stack` to `template`.
    ///
    /// An update with nothing to change must return `Ok(())`; the stack's
    /// existing status then stands.
    async fn update_stack(&self, stack: &StackName, template: &str) -> Result<(), BackendError>;

    /// Physical id of the resource declared as `logical_id` in `stack`.
    async fn physical_resource_id(
        &self,
        stack: &StackName,
        logical_id: &str,
    ) -> Result<Option<PhysicalResourceId>, BackendError>;
}

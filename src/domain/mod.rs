//! Backend-agnostic domain types: jobs, tokens, stacks, fleets.

mod fleet;
mod id;
mod job;
mod outcome;
mod stack;
mod token;

pub mod parameters;

pub use fleet::{FleetHealth, MemberHealth};
pub use id::{BuildId, InstanceId, JobId, PhysicalResourceId, StackName};
pub use job::{ArtifactCredentials, ArtifactLocation, InputArtifact, JobInvocation};
pub use outcome::{FailureDetails, FailureKind, Outcome};
pub use parameters::ParameterMap;
pub use stack::{StackPhase, StackStatus};
pub use token::{ContinuationToken, JobState};

//! Handler components and entry points.
//!
//! - [`resolver`] - action configuration, continuation state, stack names
//! - [`artifact`] - per-invocation artifact package reading
//! - [`reporter`] - result reporting to the orchestrator
//! - [`stack`] - the resumable stack lifecycle driver
//! - [`fleet`] - fleet attachment and fleet health waiting
//! - [`handler`] - the entry points with their catch-all failure boundary

pub mod artifact;
pub mod backends;
pub mod fleet;
pub mod handler;
pub mod reporter;
pub mod resolver;
pub mod stack;

pub use artifact::ArtifactReader;
pub use backends::Backends;
pub use fleet::{FleetAttacher, FleetHealthWaiter, FleetPair};
pub use handler::{Action, Handlers};
pub use reporter::JobReporter;
pub use stack::StackDriver;

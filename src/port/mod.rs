//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Every remote system the handlers talk to sits behind one of these
//! traits. Hosts construct the real clients; tests substitute the fakes in
//! [`crate::testkit`].
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │      app (handlers)      │
//!                 │   domain + port traits   │
//!                 └────────────┬─────────────┘
//!      ┌─────────────┬─────────┴───┬──────────────┐
//!      ▼             ▼             ▼              ▼
//! ┌──────────┐ ┌───────────┐ ┌────────────┐ ┌───────────┐
//! │ Pipeline │ │ Artifact  │ │Provisioning│ │  Fleet /  │
//! │ job API  │ │  store    │ │  backend   │ │ balancer  │
//! └──────────┘ └───────────┘ └────────────┘ └───────────┘
//! ```

pub mod outbound;

pub use outbound::artifact::{ArtifactStore, PackageReader};
pub use outbound::fleet::{BalancerBackend, FleetBackend};
pub use outbound::pipeline::JobResultApi;
pub use outbound::provisioning::StackBackend;

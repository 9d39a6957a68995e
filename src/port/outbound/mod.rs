//! Outbound ports (driven side): interfaces implemented by backend clients.

pub mod artifact;
pub mod fleet;
pub mod pipeline;
pub mod provisioning;

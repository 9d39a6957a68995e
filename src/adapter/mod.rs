//! Adapters between the outside world and the handlers.
//!
//! Backend clients are supplied by the host through the traits in
//! [`crate::port`]; the only adapter shipped here decodes the
//! orchestrator's invocation event.

pub mod inbound;

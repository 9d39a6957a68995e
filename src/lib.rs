//! Stagehand - resumable custom-action handlers for delivery pipelines.
//!
//! A pipeline orchestrator invokes one of three handlers per stage run:
//!
//! - **deploy-stack** - create or update the stack `<stack_prefix>-<build>`
//!   and wait for it to settle
//! - **attach-fleet** - attach the fleet from the `asg_stack_prefix` stack to
//!   the balancer from the `elb_stack_prefix` stack
//! - **await-fleet-health** - wait until every fleet member is healthy
//!   behind that balancer
//!
//! The orchestrator bounds how long one invocation may run, while stack
//! operations and health convergence take much longer. Long-running
//! handlers therefore report a *continuation*: they succeed the current
//! attempt with an opaque token and the orchestrator invokes them again
//! later with that token. The token is the only state kept between
//! invocations; see [`domain::JobState`].
//!
//! # Modules
//!
//! - [`domain`] - Jobs, continuation state, stack statuses, fleet health
//! - [`port`] - Traits for the orchestrator, artifact store, and backends
//! - [`adapter`] - Invocation event decoding
//! - [`app`] - Handler components and entry points
//! - [`config`] - Handler settings and logging
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use stagehand::app::{Action, Backends, Handlers};
//! use stagehand::config::Config;
//!
//! async fn invoke(backends: Backends, event: serde_json::Value) -> stagehand::error::Result<()> {
//!     let config = Config::default();
//!     config.logging.init();
//!     let handlers = Handlers::new(backends, config);
//!     handlers.handle_event(Action::DeployStack, event).await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

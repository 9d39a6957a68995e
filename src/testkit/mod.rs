//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fakes`] - In-memory implementations of every port that record the
//!   calls made against them.
//! - [`domain`] - Builders for job invocations and artifact packages.

pub mod domain;
pub mod fakes;

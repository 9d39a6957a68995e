//! Identifier newtypes.
//!
//! The inner strings are private so construction always goes through the
//! defined constructors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Orchestrator-issued identifier for one job execution attempt.
    JobId
);

string_id!(
    /// Compute instance identifier as reported by the fleet backend.
    InstanceId
);

string_id!(
    /// Backend-assigned identifier of a provisioned resource
    /// (fleet manager name, balancer name, ...).
    PhysicalResourceId
);

/// Build identifier read from the artifact's marker entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    /// Parse a build id from the raw marker text, trimming surrounding
    /// whitespace. Blank markers are rejected.
    pub fn from_marker(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "build_id",
                reason: "marker entry is empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an infrastructure stack, always `<prefix>-<build-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackName(String);

impl StackName {
    /// Derive the stack name for a prefix and build.
    ///
    /// The mapping is pure: the same prefix and build id always produce the
    /// same name, which keeps create/update idempotent across retries.
    pub fn derive(prefix: &str, build_id: &BuildId) -> Result<Self, ConfigError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "stack_prefix",
                reason: "prefix cannot be empty".to_string(),
            });
        }
        Ok(Self(format!("{prefix}-{build_id}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

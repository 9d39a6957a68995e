//! Handler settings.
//!
//! Per-job parameters come from the orchestrator; this is the handler's own
//! configuration: logging, the artifact marker, the logical resource names
//! of the fleet stacks, and reporting limits. Every section has defaults so
//! a host may run without a settings file.
//!
//! # Example
//!
//! ```no_run
//! use stagehand::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("stagehand.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

mod logging;

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

pub use logging::LoggingConfig;

/// Maximum failure message length the orchestrator accepts.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 5000;

/// Artifact package settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Entry whose trimmed contents are the build id.
    pub marker_entry: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            marker_entry: "BUILD_ID".into(),
        }
    }
}

/// Logical names used to locate fleet resources inside their stacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Logical id of the fleet manager in the fleet stack.
    pub fleet_logical_id: String,
    /// Logical id of the balancer in the balancer stack.
    pub balancer_logical_id: String,
    /// Balancer state that counts as healthy.
    pub healthy_state: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            fleet_logical_id: "WebAutoScalingGroup".into(),
            balancer_logical_id: "ELB".into(),
            healthy_state: "InService".into(),
        }
    }
}

/// Result reporting limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub max_message_chars: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

/// Top-level handler configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub artifact: ArtifactConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.artifact.marker_entry.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "marker_entry",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if self.fleet.fleet_logical_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fleet_logical_id",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if self.fleet.balancer_logical_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "balancer_logical_id",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if self.fleet.healthy_state.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "healthy_state",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if self.reporting.max_message_chars == 0
            || self.reporting.max_message_chars > DEFAULT_MAX_MESSAGE_CHARS
        {
            return Err(ConfigError::InvalidValue {
                field: "max_message_chars",
                reason: format!("must be between 1 and {DEFAULT_MAX_MESSAGE_CHARS}"),
            }
            .into());
        }
        Ok(())
    }
}

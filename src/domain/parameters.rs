//! Action configuration parsing.
//!
//! The orchestrator hands each job a single flat string of comma-separated
//! `key=value` pairs. There is no escaping: commas always separate pairs and
//! the first `=` in a pair separates key from value.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Parameter keys understood by the handlers.
pub mod keys {
    pub const ARTIFACT: &str = "artifact";
    pub const STACK_PREFIX: &str = "stack_prefix";
    pub const TEMPLATE: &str = "template";
    pub const ASG_STACK_PREFIX: &str = "asg_stack_prefix";
    pub const ELB_STACK_PREFIX: &str = "elb_stack_prefix";
}

/// Parsed action configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    values: HashMap<String, String>,
}

impl ParameterMap {
    /// Parse a `key=value,key=value` string.
    ///
    /// Whitespace around keys and values is trimmed and blank segments are
    /// skipped. A repeated key keeps its last value.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for segment in raw.split(',') {
            if segment.trim().is_empty() {
                continue;
            }
            let (key, value) =
                segment
                    .split_once('=')
                    .ok_or_else(|| ConfigError::MalformedParameter {
                        segment: segment.trim().to_string(),
                    })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::MalformedParameter {
                    segment: segment.trim().to_string(),
                });
            }
            values.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self { values })
    }

    /// Look up an optional key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a key the current handler cannot run without.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingParameter {
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_pairs() {
        let params = ParameterMap::parse("a=1, b=2").unwrap();
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = ParameterMap::parse("artifact=out,stack_prefix=app").unwrap();
        let reverse = ParameterMap::parse(" stack_prefix = app , artifact = out ").unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn blank_segments_are_skipped() {
        let params = ParameterMap::parse("a=1,,b=2,").unwrap();
        assert_eq!(params.len(), 2);
        assert!(ParameterMap::parse("").unwrap().is_empty());
    }

    #[test]
    fn value_keeps_text_after_first_equals() {
        let params = ParameterMap::parse("query=a=b").unwrap();
        assert_eq!(params.get("query"), Some("a=b"));
    }

    #[test]
    fn last_duplicate_wins() {
        let params = ParameterMap::parse("a=1,a=2").unwrap();
        assert_eq!(params.get("a"), Some("2"));
    }

    #[test]
    fn segment_without_equals_is_malformed() {
        let err = ParameterMap::parse("a=1,oops").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedParameter { segment } if segment == "oops"));
    }

    #[test]
    fn empty_key_is_malformed() {
        assert!(ParameterMap::parse("=value").is_err());
    }

    #[test]
    fn require_reports_missing_key() {
        let params = ParameterMap::parse("a=1").unwrap();
        let err = params.require(keys::STACK_PREFIX).unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: stack_prefix");
    }
}

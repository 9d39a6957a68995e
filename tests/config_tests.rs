use std::io::Write;

use stagehand::config::Config;
use stagehand::error::{ConfigError, Error};

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn config_loads_from_file() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[artifact]
marker_entry = "VERSION"

[fleet]
fleet_logical_id = "AppFleet"
balancer_logical_id = "AppBalancer"
healthy_state = "healthy"

[reporting]
max_message_chars = 1000
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.artifact.marker_entry, "VERSION");
    assert_eq!(config.fleet.fleet_logical_id, "AppFleet");
    assert_eq!(config.fleet.balancer_logical_id, "AppBalancer");
    assert_eq!(config.fleet.healthy_state, "healthy");
    assert_eq!(config.reporting.max_message_chars, 1000);
}

#[test]
fn config_rejects_zero_message_limit() {
    let file = write_temp_config("[reporting]\nmax_message_chars = 0\n");

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_message_chars",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid message limit error, got {err}"),
        Ok(config) => panic!(
            "Expected zero limit to be rejected, got {}",
            config.reporting.max_message_chars
        ),
    }
}

#[test]
fn config_reports_missing_file() {
    let result = Config::load("/nonexistent/stagehand.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

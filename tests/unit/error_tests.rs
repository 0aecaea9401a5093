// Error type unit tests

use kura::error::ConfigError;
use std::error::Error;

#[test]
fn test_io_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "policy.yaml");
    let err: ConfigError = io.into();
    assert!(err.to_string().starts_with("Failed to read config file"));
    assert!(err.source().is_some());
}

#[test]
fn test_yaml_error_converts() {
    let yaml_err = serde_yaml::from_str::<u64>("[").unwrap_err();
    let err: ConfigError = yaml_err.into();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_invalid_value_message() {
    let err = ConfigError::InvalidValue("heuristic_fraction must be in (0, 1]".to_string());
    assert_eq!(
        err.to_string(),
        "Invalid configuration value: heuristic_fraction must be in (0, 1]"
    );
}

// Configuration unit tests

use kura::config::PolicyConfig;
use kura::error::ConfigError;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes()).expect("Failed to write temp file");
    file
}

#[test]
fn test_can_load_config_from_file() {
    let file = write_config(
        r#"
shared_cache: true
allow_heuristics: true
heuristic_fraction: 0.25
max_heuristic_lifetime_secs: 3600
"#,
    );

    let config = PolicyConfig::from_file(file.path()).expect("Failed to load config");
    assert!(config.shared_cache);
    assert!(config.allow_heuristics);
    assert_eq!(config.heuristic_fraction, 0.25);
    assert_eq!(config.max_heuristic_lifetime(), Duration::from_secs(3600));
}

#[test]
fn test_missing_fields_take_defaults() {
    let file = write_config("shared_cache: true\n");
    let config = PolicyConfig::from_file(file.path()).unwrap();
    assert_eq!(
        config,
        PolicyConfig {
            shared_cache: true,
            ..PolicyConfig::default()
        }
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PolicyConfig::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_file_values_are_validated() {
    let file = write_config("heuristic_fraction: 2.0\n");
    let result = PolicyConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
}

#[test]
fn test_file_env_substitution() {
    // Test: ${VAR} references in a file resolve from the environment
    std::env::set_var("KURA_CONFIG_TEST_FRACTION", "0.5");
    let file = write_config("heuristic_fraction: ${KURA_CONFIG_TEST_FRACTION}\n");
    let config = PolicyConfig::from_file(file.path()).unwrap();
    assert_eq!(config.heuristic_fraction, 0.5);
}

#[test]
fn test_unknown_field_types_are_rejected() {
    let file = write_config("shared_cache: \"sometimes\"\n");
    let result = PolicyConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn test_config_round_trips_through_yaml() {
    let config = PolicyConfig::shared_cache();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed = PolicyConfig::from_yaml_with_env(&yaml).unwrap();
    assert_eq!(parsed, config);
}

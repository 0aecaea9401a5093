// Error types module

use thiserror::Error;

/// Errors raised while loading or validating policy configuration
///
/// Header parsing and the caching decisions themselves never fail: an
/// unusable header value is reported as an absent value instead. Only the
/// configuration layer that feeds those decisions can produce an error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid YAML for the expected shape
    #[error("Invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `${VAR}` reference names an unset environment variable
    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    /// A field holds a value outside its accepted range
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

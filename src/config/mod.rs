// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{DEFAULT_HEURISTIC_FRACTION, DEFAULT_MAX_HEURISTIC_LIFETIME_SECS};
use crate::error::ConfigError;

/// Settings that shape the caching rules for one cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// The cache serves more than one user (a proxy or CDN)
    #[serde(default)]
    pub shared_cache: bool,

    /// Responses without explicit freshness may get a heuristic lifetime
    #[serde(default = "default_allow_heuristics")]
    pub allow_heuristics: bool,

    /// Share of the time since Last-Modified granted as heuristic freshness
    #[serde(default = "default_heuristic_fraction")]
    pub heuristic_fraction: f64,

    /// Upper bound on a heuristic freshness lifetime
    #[serde(default = "default_max_heuristic_lifetime_secs")]
    pub max_heuristic_lifetime_secs: u64,
}

fn default_allow_heuristics() -> bool {
    true
}

fn default_heuristic_fraction() -> f64 {
    DEFAULT_HEURISTIC_FRACTION
}

fn default_max_heuristic_lifetime_secs() -> u64 {
    DEFAULT_MAX_HEURISTIC_LIFETIME_SECS
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            shared_cache: false,
            allow_heuristics: default_allow_heuristics(),
            heuristic_fraction: default_heuristic_fraction(),
            max_heuristic_lifetime_secs: default_max_heuristic_lifetime_secs(),
        }
    }
}

impl PolicyConfig {
    /// Defaults for a private (single-user) cache.
    pub fn private_cache() -> Self {
        Self::default()
    }

    /// Defaults for a shared cache.
    pub fn shared_cache() -> Self {
        Self {
            shared_cache: true,
            ..Self::default()
        }
    }

    pub fn max_heuristic_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_heuristic_lifetime_secs)
    }

    /// Parse YAML, replacing `${VAR_NAME}` with environment variable values.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let config: PolicyConfig = serde_yaml::from_str(&substituted)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.heuristic_fraction > 0.0 && self.heuristic_fraction <= 1.0) {
            return Err(ConfigError::InvalidValue(format!(
                "heuristic_fraction must be in (0, 1], got {}",
                self.heuristic_fraction
            )));
        }

        if self.max_heuristic_lifetime_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "max_heuristic_lifetime_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

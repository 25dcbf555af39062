//! Player configuration
//!
//! Loaded from environment variables with the `TEXTQUEST` prefix; nested
//! values are separated by a double underscore:
//!
//! - `TEXTQUEST__API__BASE_URL=http://localhost:5001/api` -> `api.base_url`
//! - `TEXTQUEST__RETRY__MAX_RETRIES=3` -> `retry.max_retries`
//! - `TEXTQUEST__SESSION__LOG_CAPACITY=200` -> `session.log_capacity`
//! - `TEXTQUEST__STORAGE__PATH=/tmp/textquest.json` -> `storage.path`
//!
//! Every section has defaults, so an empty environment is a valid setup.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::application::dto::{DEFAULT_LOG_CAPACITY, MAX_LOG_CAPACITY};
use crate::infrastructure::{RetryPolicy, DEFAULT_API_BASE_URL};

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("API base URL must use http or https")]
    UnsupportedScheme,

    #[error("Log capacity must be at least 1")]
    InvalidLogCapacity,

    #[error("Log capacity {0} exceeds the maximum of {MAX_LOG_CAPACITY}")]
    LogCapacityTooLarge(usize),

    #[error("Retry jitter factor must be between 0 and 1")]
    InvalidJitter,

    #[error("Invalid request timeout")]
    InvalidTimeout,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of log entries kept
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
        }
    }
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Settings file; the platform config directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PlayerConfig {
    /// Load and validate configuration from `TEXTQUEST__*` environment
    /// variables.
    ///
    /// `.env` files are the binary's concern; this only reads the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TEXTQUEST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ValidationError::InvalidBaseUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme);
        }
        if self.session.log_capacity == 0 {
            return Err(ValidationError::InvalidLogCapacity);
        }
        if self.session.log_capacity > MAX_LOG_CAPACITY {
            return Err(ValidationError::LogCapacityTooLarge(
                self.session.log_capacity,
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ValidationError::InvalidJitter);
        }
        if self.retry.timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TEXTQUEST__API__BASE_URL",
        "TEXTQUEST__RETRY__MAX_RETRIES",
        "TEXTQUEST__RETRY__TIMEOUT_MS",
        "TEXTQUEST__SESSION__LOG_CAPACITY",
        "TEXTQUEST__STORAGE__PATH",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = PlayerConfig::load().unwrap();

        assert_eq!(config.api.base_url, "http://localhost:5001/api");
        assert_eq!(config.session.log_capacity, 100);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.storage.path, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_values_come_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("TEXTQUEST__API__BASE_URL", "https://game.example.com/api");
        env::set_var("TEXTQUEST__RETRY__MAX_RETRIES", "5");
        env::set_var("TEXTQUEST__SESSION__LOG_CAPACITY", "20");
        env::set_var("TEXTQUEST__STORAGE__PATH", "/tmp/textquest.json");
        let result = PlayerConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://game.example.com/api");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, RetryPolicy::default().base_delay_ms);
        assert_eq!(config.session.log_capacity, 20);
        assert_eq!(
            config.storage.path,
            Some(PathBuf::from("/tmp/textquest.json"))
        );
    }

    #[test]
    fn load_rejects_oversized_log_capacity() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("TEXTQUEST__SESSION__LOG_CAPACITY", "1000000");
        let result = PlayerConfig::load();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(
                ValidationError::LogCapacityTooLarge(_)
            ))
        ));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = PlayerConfig::default();
        config.api.base_url = "not a url".into();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));

        let mut config = PlayerConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert_eq!(config.validate(), Err(ValidationError::UnsupportedScheme));

        let mut config = PlayerConfig::default();
        config.session.log_capacity = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidLogCapacity));

        let mut config = PlayerConfig::default();
        config.session.log_capacity = MAX_LOG_CAPACITY + 1;
        assert_eq!(
            config.validate(),
            Err(ValidationError::LogCapacityTooLarge(MAX_LOG_CAPACITY + 1))
        );

        let mut config = PlayerConfig::default();
        config.retry.jitter_factor = 1.5;
        assert_eq!(config.validate(), Err(ValidationError::InvalidJitter));

        let mut config = PlayerConfig::default();
        config.retry.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}

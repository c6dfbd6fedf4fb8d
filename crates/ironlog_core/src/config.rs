//! Runtime configuration resolved from `IRONLOG_*` environment variables.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Invalid values are rejected, never silently replaced by defaults.

use crate::logging::{default_log_level, LogLevel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "IRONLOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "IRONLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "IRONLOG_LOG_DIR";
pub const ENV_SEED: &str = "IRONLOG_SEED";

const DEFAULT_DB_FILE_NAME: &str = "ironlog.sqlite3";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    /// Create the demo template on an empty store.
    pub seed: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            seed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidFlag { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidFlag { key, value } => write!(
                f,
                "invalid value `{value}` for {key}; expected 1|true|yes|0|false|no"
            ),
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = value_of(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value_of(ENV_LOG_LEVEL) {
            config.log_level =
                LogLevel::parse(&level).ok_or(ConfigError::InvalidLogLevel(level))?;
        }
        config.log_dir = value_of(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(flag) = value_of(ENV_SEED) {
            config.seed = parse_flag(ENV_SEED, flag)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_SEED};
    use crate::logging::{default_log_level, LogLevel};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(pairs: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
        assert!(config.seed);
        assert!(config.log_dir.is_none());
        assert!(config.db_path.ends_with("ironlog.sqlite3"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = resolve(&[
            (ENV_DB_PATH, "/data/gym.sqlite3"),
            (ENV_LOG_LEVEL, "WARN"),
            (ENV_LOG_DIR, "/var/log/ironlog"),
            (ENV_SEED, "no"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/gym.sqlite3"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/ironlog")));
        assert!(!config.seed);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = resolve(&[(ENV_LOG_DIR, "   "), (ENV_SEED, "")]).unwrap();
        assert!(config.log_dir.is_none());
        assert!(config.seed);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            resolve(&[(ENV_LOG_LEVEL, "loud")]).unwrap_err(),
            ConfigError::InvalidLogLevel("loud".to_string())
        );
        assert_eq!(
            resolve(&[(ENV_SEED, "maybe")]).unwrap_err(),
            ConfigError::InvalidFlag {
                key: ENV_SEED,
                value: "maybe".to_string()
            }
        );
    }
}

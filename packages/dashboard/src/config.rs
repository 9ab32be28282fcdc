//! Session configuration.
//!
//! Defaults are overridden first by an optional TOML file named in
//! `DAIRY_TNFD_CONFIG`, then by individual environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dairy_tnfd_generate::{DEFAULT_FARM_COUNT, DEFAULT_SEED};
use serde::Deserialize;
use thiserror::Error;

/// Path of an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "DAIRY_TNFD_CONFIG";
/// Generator seed override.
pub const SEED_ENV: &str = "DAIRY_TNFD_SEED";
/// Portfolio size override.
pub const FARM_COUNT_ENV: &str = "DAIRY_TNFD_FARM_COUNT";
/// Simulated assistant latency override, in milliseconds.
pub const CHAT_LATENCY_ENV: &str = "DAIRY_TNFD_CHAT_LATENCY_MS";

/// Default simulated assistant latency in milliseconds.
pub const DEFAULT_CHAT_LATENCY_MS: u64 = 1000;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// An environment variable held a value that does not parse.
    #[error("Invalid value '{value}' for {name}: {message}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// Raw value.
        value: String,
        /// Parse failure.
        message: String,
    },
}

/// Settings for one dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Seed for the sample portfolio generator.
    pub seed: u64,
    /// Number of farms to generate.
    pub farm_count: usize,
    /// Simulated assistant latency in milliseconds.
    pub chat_latency_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            farm_count: DEFAULT_FARM_COUNT,
            chat_latency_ms: DEFAULT_CHAT_LATENCY_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    seed: Option<u64>,
    farm_count: Option<usize>,
    chat_latency_ms: Option<u64>,
}

impl DashboardConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if an override variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = config.with_overrides(|name| std::env::var(name).ok())?;

        log::info!(
            "Dashboard config: seed={} farms={} chat latency={}ms",
            config.seed,
            config.farm_count,
            config.chat_latency_ms
        );

        Ok(config)
    }

    /// Loads defaults overlaid with a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::default().with_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies the keys present in `contents`.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    pub fn with_toml(self, contents: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(Self {
            seed: file.seed.unwrap_or(self.seed),
            farm_count: file.farm_count.unwrap_or(self.farm_count),
            chat_latency_ms: file.chat_latency_ms.unwrap_or(self.chat_latency_ms),
        })
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for a value that does not parse.
    pub fn with_overrides(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            seed: parse_override(&lookup, SEED_ENV)?.unwrap_or(self.seed),
            farm_count: parse_override(&lookup, FARM_COUNT_ENV)?.unwrap_or(self.farm_count),
            chat_latency_ms: parse_override(&lookup, CHAT_LATENCY_ENV)?
                .unwrap_or(self.chat_latency_ms),
        })
    }

    /// Simulated assistant latency.
    #[must_use]
    pub const fn chat_latency(&self) -> Duration {
        Duration::from_millis(self.chat_latency_ms)
    }
}

fn parse_override<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidEnv {
            name: name.to_string(),
            value,
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let config = DashboardConfig::default().with_overrides(env(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.chat_latency(), Duration::from_secs(1));
    }

    #[test]
    fn env_overrides_apply() {
        let config = DashboardConfig::default()
            .with_overrides(env(&[
                (SEED_ENV, "99"),
                (FARM_COUNT_ENV, " 40 "),
                (CHAT_LATENCY_ENV, "0"),
            ]))
            .unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.farm_count, 40);
        assert_eq!(config.chat_latency_ms, 0);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let err = DashboardConfig::default()
            .with_overrides(env(&[(FARM_COUNT_ENV, "lots")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidEnv { name, value, .. } => {
                assert_eq!(name, FARM_COUNT_ENV);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn toml_sets_only_present_keys() {
        let config = DashboardConfig::default()
            .with_toml("farm_count = 5\n")
            .unwrap();
        assert_eq!(config.farm_count, 5);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(DashboardConfig::default().with_toml("farms = 5\n").is_err());
    }

    #[test]
    fn env_wins_over_toml() {
        let config = DashboardConfig::default()
            .with_toml("seed = 1\nchat_latency_ms = 10\n")
            .unwrap()
            .with_overrides(env(&[(SEED_ENV, "2")]))
            .unwrap();
        assert_eq!(config.seed, 2);
        assert_eq!(config.chat_latency_ms, 10);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/dairy-tnfd.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

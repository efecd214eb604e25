// Server configuration - loaded from ZOO_API_* environment variables and .env

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "ZOO_API_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// TCP port the HTTP listener binds on all interfaces.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file; parent directories are created on open.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Leave the underlying store error out of 500 response bodies.
    #[serde(default)]
    pub redact_store_errors: bool,
}

fn default_port() -> u16 {
    3300
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/lambda.sqlite3")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
            log_level: default_log_level(),
            redact_store_errors: false,
        }
    }
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// Load from explicit key/value pairs (keys carry the prefix).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(pairs)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid(format!("{ENV_PREFIX}PORT must be non-zero")));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{ENV_PREFIX}DATABASE_PATH must not be empty"
            )));
        }

        Ok(())
    }
}

//! Runtime configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CAFE_STORE_BUFFER` - Request queue depth per store actor (default: 32)
//! - `CAFE_STORE_TIMEOUT_MS` - Per-request store timeout; `0` disables it (default: 5000)
//! - `CAFE_DATA_DIR` - Directory for JSON snapshots; unset keeps everything in memory
//!
//! Logging is controlled separately through `RUST_LOG`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_STORE_BUFFER: usize = 32;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub store_buffer: usize,
    pub store_timeout: Option<Duration>,
    pub data_dir: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store_buffer: DEFAULT_STORE_BUFFER,
            store_timeout: Some(Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS)),
            data_dir: None,
        }
    }
}

impl SystemConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests don't have to touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_buffer = match lookup("CAFE_STORE_BUFFER") {
            Some(raw) => parse::<usize>("CAFE_STORE_BUFFER", &raw)?,
            None => DEFAULT_STORE_BUFFER,
        };
        if store_buffer == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CAFE_STORE_BUFFER".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let timeout_ms = match lookup("CAFE_STORE_TIMEOUT_MS") {
            Some(raw) => parse::<u64>("CAFE_STORE_TIMEOUT_MS", &raw)?,
            None => DEFAULT_STORE_TIMEOUT_MS,
        };
        let store_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let data_dir = lookup("CAFE_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            store_buffer,
            store_timeout,
            data_dir,
        })
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

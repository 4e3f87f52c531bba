//! RON configuration for the shell.
//!
//! ```ron
//! (
//!     endpoint_url: "http://localhost:5000/predict",
//!     request_timeout_ms: Some(30000),
//!     log_destination: Both,
//!     log_level: "debug",
//! )
//! ```
//!
//! Every key is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use factcheck_engine::{ClientSettings, PredictionError, DEFAULT_ENDPOINT};
use factcheck_logging::parse_level;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "factcheck.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid endpoint_url: {0}")]
    Endpoint(#[from] PredictionError),
    #[error("unknown log_level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint_url: String,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_ms: None,
            request_timeout_ms: None,
            max_response_bytes: 64 * 1024,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        let mut settings = ClientSettings::parse(&self.endpoint_url)?;
        settings.connect_timeout = self.connect_timeout_ms.map(Duration::from_millis);
        settings.request_timeout = self.request_timeout_ms.map(Duration::from_millis);
        settings.max_response_bytes = self.max_response_bytes;
        Ok(settings)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.log_level).ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }
}

/// Loads the config from `explicit`, which must exist, or from
/// `./factcheck.ron` when present. Falls back to defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => load_from(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILENAME);
            if path.exists() {
                load_from(path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

//! Application configuration, read from an optional RON file.
//!
//! Lookup order: the path in `SCANNER_CONFIG`, then `./scanner.ron`. A missing
//! file means defaults; every field may be omitted.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scanner_engine::TransportSettings;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::logging::{LogDestination, DEFAULT_LOG_FILE};

const CONFIG_FILENAME: &str = "scanner.ron";
const CONFIG_ENV_VAR: &str = "SCANNER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let transport = TransportSettings::default();
        Self {
            base_url: TransportSettings::DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: transport.connect_timeout.as_millis() as u64,
            request_timeout_ms: transport.request_timeout.as_millis() as u64,
            max_response_bytes: transport.max_response_bytes,
            log_destination: LogDestination::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

impl AppConfig {
    pub fn transport_settings(&self) -> Result<TransportSettings, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(TransportSettings {
            base_url,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_response_bytes: self.max_response_bytes,
        })
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at this path; every field is a default.
    Defaults(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults(path) => write!(f, "defaults ({} not found)", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

/// Load from `SCANNER_CONFIG` or `./scanner.ron`.
///
/// Runs before the logger exists, so the caller reports `source` once logging is up.
pub fn load_default() -> Result<LoadedConfig, ConfigError> {
    let path = env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    load(&path)
}

pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(LoadedConfig {
                config: AppConfig::default(),
                source: ConfigSource::Defaults(path.to_path_buf()),
            })
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path.to_path_buf()),
    })
}

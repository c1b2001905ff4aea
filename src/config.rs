//! Settings loaded from `config.json`. Every field has a default, so a
//! partial (or missing) file is fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub osc: OscConfig,
    pub log: LogConfig,
}

/// Where the library listens and where the mod listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Host this library listens on for messages coming from the mod.
    pub lib_ip: String,
    /// Port this library listens on for messages coming from the mod.
    pub lib_port: u16,
    /// Host the mod listens on.
    pub cvr_ip: String,
    /// Port the mod listens on.
    pub cvr_port: u16,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            lib_ip: "127.0.0.1".to_string(),
            lib_port: 9001,
            cvr_ip: "127.0.0.1".to_string(),
            cvr_port: 9000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `info` or `cvr_osc=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

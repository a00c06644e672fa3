//! Configuration loading
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Defaults
//! 2. `patchpath.toml` in the working directory, or the file given with `--config`
//! 3. CLI flags
//!
//! ```toml
//! data = "data/store.json"
//! seed = true
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use patchpath_server::ServerConfig;
use serde::Deserialize;
use thiserror::Error;

/// Config file looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "patchpath.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerSection,
    /// Snapshot file to load the store from.
    pub data: Option<PathBuf>,
    /// Seed demo data when no snapshot is loaded.
    pub seed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            data: None,
            seed: true,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path, which must exist, or from
    /// [`DEFAULT_CONFIG_FILE`] if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("server.host must not be empty".into()));
        }
        Ok(())
    }

    /// Server settings with CLI overrides applied.
    pub fn server_config(&self, host: Option<String>, port: Option<u16>) -> ServerConfig {
        ServerConfig {
            host: host.unwrap_or_else(|| self.server.host.clone()),
            port: port.unwrap_or(self.server.port),
        }
    }
}

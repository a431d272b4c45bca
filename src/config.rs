//! Host configuration loaded from `config.toml`.
//!
//! ```toml
//! [log]
//! filter = "info,musicdb_lookup=debug"
//!
//! [lookup]
//! timeout_seconds = 10
//!
//! [lookup.jwid.rate_limit]
//! min_time_ms = 1200
//! ```

use crate::error::{MusicDbError, Result};
use musicdb_lookup::LookupConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MUSICDB_CONFIG";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicDbConfig {
    pub log: LogConfig,
    pub lookup: LookupConfig,
}

impl MusicDbConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or the
    /// lookup section fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| MusicDbError::Config(e.to_string()))?;
        config.lookup.validate()?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Returns the default config file path: `~/.config/musicdb/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("musicdb").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("musicdb")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/musicdb-config/config.toml")
        }
    }

    /// Config path from [`CONFIG_PATH_ENV`], else [`default_config_path`](Self::default_config_path).
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path)
    }
}

//! Configuration loader for sigscan
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up by [`load_config`]
pub const CONFIG_FILE: &str = "sigscan.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Bytes copied per remote read, before the pattern overlap is added
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Fault recovery granularity; 0 uses the OS page size
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Cap on the number of addresses `find_all` returns
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl ScannerConfig {
    /// Page size to skip by after a failed read
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            crate::memory::page_size()
        } else {
            self.page_size
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub with_target: bool,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file is missing or unreadable
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            tracing::debug!("Using default configuration: {}", e);
            Config::default()
        })
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads `sigscan.toml` from the working directory, falling back to defaults.
///
/// A file that exists but does not parse is an error.
pub fn load_config() -> Result<Config, ConfigError> {
    match ConfigLoader::new(CONFIG_FILE).load() {
        Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
        other => other,
    }
}

// Default functions for serde
fn default_chunk_size() -> usize {
    default_config().scanner.chunk_size
}

fn default_page_size() -> usize {
    default_config().scanner.page_size
}

fn default_max_results() -> usize {
    default_config().scanner.max_results
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            chunk_size: default_chunk_size(),
            page_size: default_page_size(),
            max_results: default_max_results(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let defaults = default_config();
        LoggingConfig {
            level: defaults.logging.level,
            with_target: defaults.logging.with_target,
        }
    }
}

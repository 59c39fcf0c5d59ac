//! Configuration loader for memory-modder
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::core::types::ValueType;
use crate::memory::ScanOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up by [`load_config`]
pub const DEFAULT_CONFIG_FILE: &str = "memory-modder.toml";

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
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scanner")]
    pub scanner: ScannerConfig,

    #[serde(default = "default_display")]
    pub display: DisplayConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Value type used when a scan command names none
    #[serde(default = "default_value_type")]
    pub value_type: String,
    #[serde(default = "default_aligned")]
    pub aligned: bool,
    #[serde(default = "default_include_mapped")]
    pub include_mapped: bool,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Addresses shown by a listing
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
    /// Longest hex dump accepted
    #[serde(default = "default_max_dump_bytes")]
    pub max_dump_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Config {
    /// Default value type for scans
    pub fn value_type(&self) -> Result<ValueType, ConfigError> {
        self.scanner
            .value_type
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Unknown value type: {}", self.scanner.value_type)))
    }

    /// Scan options with the configured alignment and mapping policy
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            aligned: self.scanner.aligned,
            include_mapped: self.scanner.include_mapped,
        }
    }
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

    pub fn path(&self) -> &Path {
        &self.config_path
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

    /// Loads configuration, or returns defaults if the file doesn't exist.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()
}

// Default functions for serde
fn default_scanner() -> ScannerConfig {
    let defaults = default_config();
    ScannerConfig {
        value_type: defaults.scanner.value_type,
        aligned: defaults.scanner.aligned,
        include_mapped: defaults.scanner.include_mapped,
    }
}

fn default_display() -> DisplayConfig {
    let defaults = default_config();
    DisplayConfig {
        preview_count: defaults.display.preview_count,
        max_dump_bytes: defaults.display.max_dump_bytes,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_value_type() -> String {
    default_config().scanner.value_type
}

fn default_aligned() -> bool {
    default_config().scanner.aligned
}

fn default_include_mapped() -> bool {
    default_config().scanner.include_mapped
}

fn default_preview_count() -> usize {
    default_config().display.preview_count
}

fn default_max_dump_bytes() -> usize {
    default_config().display.max_dump_bytes
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scanner: default_scanner(),
            display: default_display(),
            logging: default_logging(),
        }
    }
}

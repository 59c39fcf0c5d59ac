//! Configuration module for memory-modder
//!
//! Provides configuration loading, validation, and default settings
//! for the scanner and its command-line driver.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{
    load_config, Config, ConfigError, ConfigLoader, DisplayConfig, LoggingConfig, ScannerConfig,
    DEFAULT_CONFIG_FILE,
};
pub use validator::{validate_config, ConfigValidator, MAX_PREVIEW_COUNT};

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

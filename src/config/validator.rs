//! Configuration validator for memory-modder
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, DisplayConfig, LoggingConfig};
use crate::memory::MAX_READ_BYTES;

/// Upper bound for the listing size
pub const MAX_PREVIEW_COUNT: usize = 4096;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config.value_type()?;
        Self::validate_display(&config.display)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_display(display: &DisplayConfig) -> Result<(), ConfigError> {
        if display.preview_count == 0 || display.preview_count > MAX_PREVIEW_COUNT {
            return Err(ConfigError::Invalid(format!(
                "Preview count must be between 1 and {}",
                MAX_PREVIEW_COUNT
            )));
        }

        if display.max_dump_bytes == 0 || display.max_dump_bytes > MAX_READ_BYTES {
            return Err(ConfigError::Invalid(format!(
                "Dump limit must be between 1 and {} bytes",
                MAX_READ_BYTES
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_value_type() {
        let mut config = Config::default();
        config.scanner.value_type = "i128".to_string();
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("value type"));
    }

    #[test]
    fn test_preview_count_bounds() {
        let mut config = Config::default();
        config.display.preview_count = 0;
        assert!(validate_config(&config).is_err());

        config.display.preview_count = MAX_PREVIEW_COUNT + 1;
        assert!(validate_config(&config).is_err());

        config.display.preview_count = 1;
        assert!(validate_config(&config).is_ok());

        config.display.preview_count = MAX_PREVIEW_COUNT;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_dump_limit_bounds() {
        let mut config = Config::default();
        config.display.max_dump_bytes = 0;
        assert!(validate_config(&config).is_err());

        config.display.max_dump_bytes = MAX_READ_BYTES + 1;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Dump limit"));

        config.display.max_dump_bytes = MAX_READ_BYTES;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("log level"));

        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}

//! Default configuration values for memory-modder

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub display: DisplayDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub value_type: String,
    pub aligned: bool,
    pub include_mapped: bool,
}

/// Default display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayDefaults {
    pub preview_count: usize,
    pub max_dump_bytes: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            value_type: "i32".to_string(),
            aligned: true,
            include_mapped: true,
        },
        display: DisplayDefaults {
            preview_count: 16,
            max_dump_bytes: 4096,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_defaults() {
        let config = default_config();
        assert_eq!(config.scanner.value_type, "i32");
        assert!(config.scanner.aligned);
        assert!(config.scanner.include_mapped);
    }

    #[test]
    fn test_display_and_logging_defaults() {
        let config = default_config();
        assert_eq!(config.display.preview_count, 16);
        assert_eq!(config.display.max_dump_bytes, 4096);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("value_type"));
        assert!(serialized.contains("preview_count"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.scanner.value_type, config.scanner.value_type);
        assert_eq!(
            deserialized.display.preview_count,
            config.display.preview_count
        );
    }
}

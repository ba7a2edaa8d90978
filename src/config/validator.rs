//! Configuration validator for sigscan
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::defaults::MAX_CHUNK_SIZE;
use super::loader::{Config, ConfigError, LoggingConfig, ScannerConfig};

/// Log levels understood by the tracing filter
const VALID_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_scanner(&config.scanner)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates scanner configuration
    pub fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        if scanner.chunk_size == 0 || !scanner.chunk_size.is_power_of_two() {
            return Err(ConfigError::Invalid(
                "Chunk size must be a power of 2".to_string(),
            ));
        }

        if scanner.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "Chunk size must not exceed {} bytes",
                MAX_CHUNK_SIZE
            )));
        }

        if scanner.page_size != 0 && !scanner.page_size.is_power_of_two() {
            return Err(ConfigError::Invalid(
                "Page size must be 0 or a power of 2".to_string(),
            ));
        }

        if scanner.max_results == 0 {
            return Err(ConfigError::Invalid(
                "Maximum results must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates logging configuration
    pub fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, VALID_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

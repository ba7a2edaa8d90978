//! Default configuration values for sigscan

use serde::{Deserialize, Serialize};

/// Largest accepted remote read window, in bytes
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub chunk_size: usize,
    pub page_size: usize,
    pub max_results: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub with_target: bool,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            chunk_size: 1048576, // 1MB
            page_size: 0,        // ask the OS
            max_results: 1000,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            with_target: false,
        },
    }
}

//! Configuration module for sigscan
//!
//! Provides configuration loading, validation, and default settings
//! for the scanner and its logging.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults, MAX_CHUNK_SIZE};
pub use loader::{load_config, ConfigLoader, CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{Config, LoggingConfig, ScannerConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

//! Error types for signature scanning

use std::fmt;
use thiserror::Error;

/// Main error type for memory queries, reads and pattern parsing
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid pattern format: {0}")]
    InvalidPattern(String),

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Invalid scan range: start {start} is above end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to query memory region at {0}")]
    QueryFailed(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OS error: {0}")]
    OsError(String),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid pattern error
    pub fn invalid_pattern(reason: impl Into<String>) -> Self {
        MemoryError::InvalidPattern(reason.into())
    }

    /// Creates an inverted range error
    pub fn invalid_range(start: impl fmt::Display, end: impl fmt::Display) -> Self {
        MemoryError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Wraps the calling thread's last OS error with some context
    pub fn last_os_error(context: impl fmt::Display) -> Self {
        MemoryError::OsError(format!("{}: {}", context, std::io::Error::last_os_error()))
    }
}

//! Core type definitions for sigscan
//!
//! Address wrapper, readable region span and the error type shared by every
//! other module.

mod address;
mod error;
mod region;

// Re-export all public types
pub use address::Address;
pub use error::{MemoryError, MemoryResult};
pub use region::MemoryRegion;

// Common type aliases
pub type ProcessId = u32;
pub type Offset = usize;

//! Core module containing fundamental types for sigscan

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, MemoryError, MemoryRegion, MemoryResult};

// Platform verification at compile time
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
compile_error!("sigscan only supports Windows and Linux");

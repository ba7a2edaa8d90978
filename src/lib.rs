//! sigscan: wildcard byte-signature scanning of process memory
//!
//! Patterns such as `"48 8B ?? ?? 89"` are searched in a range of the calling
//! process, or of another process through a [`ProcessHandle`]:
//!
//! ```no_run
//! use sigscan::{Address, SignatureScanner};
//!
//! let scanner = SignatureScanner::new(Address::new(0x10000), Address::new(0x7FFF_FFFF_0000));
//! if let Some(address) = scanner.find("48 8B ?? ?? 89", 0)? {
//!     println!("found at {}", address);
//! }
//! # Ok::<(), sigscan::MemoryError>(())
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod memory;
pub mod process;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "windows")]
pub mod windows;

// Re-export main types from core module
pub use self::core::types::{Address, MemoryError, MemoryRegion, MemoryResult, ProcessId};

pub use config::{Config, ScannerConfig};
pub use memory::{MemoryRead, RegionQuery, Signature, SignatureScanner};
pub use process::ProcessHandle;

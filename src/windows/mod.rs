//! Windows API layer for region queries and cross-process reads
//!
//! All unsafe FFI calls are contained within this module.

pub mod bindings;
pub mod types;

pub use bindings::kernel32;
pub use types::MemoryBasicInfo;

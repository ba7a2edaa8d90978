//! Windows-specific type conversions

pub mod memory_info;

pub use memory_info::MemoryBasicInfo;

//! Target process handles
//!
//! Finding the process to scan is the caller's business; this module only
//! wraps a handle that already carries query and read rights.

pub mod handle;

pub use handle::{ProcessAccess, ProcessHandle};

//! Bulk reads from an address space that is not directly addressable

use crate::core::types::{Address, MemoryResult};

/// Copies bytes out of a (usually remote) address space.
pub trait MemoryRead {
    /// Reads up to `buffer.len()` bytes starting at `address`.
    ///
    /// Returns how many bytes were transferred; an `Err` means the call
    /// itself failed and the buffer contents are unspecified.
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;
}

impl<R: MemoryRead + ?Sized> MemoryRead for &R {
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        (**self).read_memory(address, buffer)
    }
}

//! Cross-process reads through `process_vm_readv`

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use std::io;

/// Copies `buffer.len()` bytes from `address` in `pid`.
///
/// Returns the number of bytes transferred, which is short when the range
/// runs into an unmapped page.
pub fn read_process_memory(pid: ProcessId, address: usize, buffer: &mut [u8]) -> MemoryResult<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }

    let local = libc::iovec {
        iov_base: buffer.as_mut_ptr() as *mut libc::c_void,
        iov_len: buffer.len(),
    };
    let remote = libc::iovec {
        iov_base: address as *mut libc::c_void,
        iov_len: buffer.len(),
    };

    let read = unsafe { libc::process_vm_readv(pid as libc::pid_t, &local, 1, &remote, 1, 0) };
    if read < 0 {
        return Err(MemoryError::read_failed(
            Address::new(address),
            format!("process_vm_readv failed: {}", io::Error::last_os_error()),
        ));
    }
    Ok(read as usize)
}

/// Page size reported by sysconf
pub fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

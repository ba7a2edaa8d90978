//! Handle to a target process for remote region queries and reads

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::reader::MemoryRead;
use std::fmt;

#[cfg(target_os = "windows")]
use crate::windows::bindings::kernel32;
#[cfg(target_os = "windows")]
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let value = rights.iter().fold(0, |acc, right| acc | right.value);
        Self { value }
    }

    /// Rights needed for region queries and bulk reads
    pub fn scan() -> Self {
        Self::combine(&[Self::QUERY_INFORMATION, Self::VM_READ])
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Owned handle to another process.
///
/// On Windows this wraps a `HANDLE` that is closed on drop; on Linux the
/// process is addressed by pid and nothing needs releasing.
pub struct ProcessHandle {
    #[cfg(target_os = "windows")]
    handle: HANDLE,
    pid: ProcessId,
}

impl ProcessHandle {
    /// Open a process with the rights a scan needs
    pub fn open_for_read(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(pid, ProcessAccess::scan())
    }

    /// Open a process with specified access rights
    #[cfg(target_os = "windows")]
    pub fn open(pid: ProcessId, access: ProcessAccess) -> MemoryResult<Self> {
        let handle = kernel32::open_process(pid, access.value())?;
        Ok(ProcessHandle { handle, pid })
    }

    /// Open a process; access rights are checked by the kernel on each read
    #[cfg(target_os = "linux")]
    pub fn open(pid: ProcessId, _access: ProcessAccess) -> MemoryResult<Self> {
        if pid == 0 || !std::path::Path::new(&format!("/proc/{}", pid)).exists() {
            return Err(MemoryError::ProcessNotFound(format!("PID: {}", pid)));
        }
        Ok(ProcessHandle { pid })
    }

    /// Adopt a raw handle that already carries query and read rights
    ///
    /// # Safety
    /// The handle must be null or a valid process handle owned by the caller;
    /// ownership moves into the returned value.
    #[cfg(target_os = "windows")]
    pub unsafe fn from_raw_handle(handle: HANDLE, pid: ProcessId) -> Self {
        ProcessHandle { handle, pid }
    }

    /// Address a process by pid without checking that it exists
    #[cfg(target_os = "linux")]
    pub fn from_pid(pid: ProcessId) -> Self {
        ProcessHandle { pid }
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get the raw handle
    ///
    /// # Safety
    /// The returned handle is only valid as long as this ProcessHandle exists
    #[cfg(target_os = "windows")]
    pub unsafe fn raw(&self) -> HANDLE {
        self.handle
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        #[cfg(target_os = "windows")]
        {
            !self.handle.is_null()
        }
        #[cfg(target_os = "linux")]
        {
            self.pid != 0
        }
    }

    /// Read memory from the process
    pub fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        if !self.is_valid() {
            return Err(MemoryError::InvalidHandle(format!(
                "no process behind handle (pid {})",
                self.pid
            )));
        }

        #[cfg(target_os = "windows")]
        {
            unsafe { kernel32::read_process_memory(self.handle, address.as_usize(), buffer) }
        }
        #[cfg(target_os = "linux")]
        {
            crate::linux::read_process_memory(self.pid, address.as_usize(), buffer)
        }
    }
}

impl MemoryRead for ProcessHandle {
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        ProcessHandle::read_memory(self, address, buffer)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            // Ignore errors on cleanup
            unsafe {
                let _ = kernel32::close_handle(self.handle);
            }
        }
    }
}

// Process handles are usable from any thread of the owning process
#[cfg(target_os = "windows")]
unsafe impl Send for ProcessHandle {}
#[cfg(target_os = "windows")]
unsafe impl Sync for ProcessHandle {}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, valid={})",
            self.pid,
            self.is_valid()
        )
    }
}

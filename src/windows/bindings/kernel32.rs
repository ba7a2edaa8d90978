//! Kernel32.dll bindings for region queries and cross-process reads

use crate::core::types::{Address, MemoryError, MemoryResult};
use std::mem;
use winapi::shared::minwindef::{FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQuery, VirtualQueryEx};
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION};

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(MemoryError::ProcessNotFound(format!("PID: {}", pid)))
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not used afterwards
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(MemoryError::last_os_error("CloseHandle"))
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadProcessMemory.
///
/// A partial copy is reported as a failure, like the call itself does.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> MemoryResult<usize> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err(MemoryError::read_failed(
            Address::new(address),
            format!(
                "ReadProcessMemory failed after {} bytes: {}",
                bytes_read,
                std::io::Error::last_os_error()
            ),
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for VirtualQuery on the calling process
pub fn virtual_query(address: usize) -> MemoryResult<MEMORY_BASIC_INFORMATION> {
    unsafe {
        let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

        let result = VirtualQuery(
            address as LPCVOID,
            &mut mbi,
            mem::size_of::<MEMORY_BASIC_INFORMATION>(),
        );

        if result != mem::size_of::<MEMORY_BASIC_INFORMATION>() {
            Err(MemoryError::QueryFailed(format!("0x{:X}", address)))
        } else {
            Ok(mbi)
        }
    }
}

/// Safe wrapper for VirtualQueryEx
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_QUERY_INFORMATION`
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: usize,
) -> MemoryResult<MEMORY_BASIC_INFORMATION> {
    let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

    let result = VirtualQueryEx(
        handle,
        address as LPCVOID,
        &mut mbi,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );

    if result != mem::size_of::<MEMORY_BASIC_INFORMATION>() {
        Err(MemoryError::QueryFailed(format!("0x{:X}", address)))
    } else {
        Ok(mbi)
    }
}

/// Page size reported by GetSystemInfo
pub fn page_size() -> usize {
    unsafe {
        let mut info: SYSTEM_INFO = mem::zeroed();
        GetSystemInfo(&mut info);
        info.dwPageSize as usize
    }
}

//! Region queries against the real local and remote address spaces

use crate::core::types::Address;
use crate::memory::regions::{RegionInfo, RegionQuery};
use crate::process::ProcessHandle;

#[cfg(target_os = "linux")]
use crate::memory::regions::RegionTable;
#[cfg(target_os = "windows")]
use crate::windows::{kernel32, MemoryBasicInfo};

/// Regions of the calling process
pub struct LocalRegions {
    #[cfg(target_os = "linux")]
    table: RegionTable,
}

impl LocalRegions {
    /// Prepares a query of the calling process.
    ///
    /// On Linux the mappings are captured here, once per scan.
    pub fn snapshot() -> Self {
        #[cfg(target_os = "windows")]
        {
            LocalRegions {}
        }
        #[cfg(target_os = "linux")]
        {
            let table = crate::linux::load_maps(None).unwrap_or_else(|e| {
                tracing::debug!("Could not read own mappings: {}", e);
                RegionTable::default()
            });
            LocalRegions { table }
        }
    }
}

impl RegionQuery for LocalRegions {
    fn query(&self, address: Address) -> Option<RegionInfo> {
        #[cfg(target_os = "windows")]
        {
            kernel32::virtual_query(address.as_usize())
                .ok()
                .map(|mbi| MemoryBasicInfo::from(mbi).into())
        }
        #[cfg(target_os = "linux")]
        {
            self.table.query(address)
        }
    }
}

/// Regions of another process
pub struct RemoteRegions<'a> {
    #[cfg_attr(target_os = "linux", allow(dead_code))]
    handle: &'a ProcessHandle,
    #[cfg(target_os = "linux")]
    table: RegionTable,
}

impl<'a> RemoteRegions<'a> {
    /// Prepares a query of the process behind `handle`.
    ///
    /// A process that cannot be inspected yields no regions.
    pub fn snapshot(handle: &'a ProcessHandle) -> Self {
        #[cfg(target_os = "windows")]
        {
            RemoteRegions { handle }
        }
        #[cfg(target_os = "linux")]
        {
            let table = crate::linux::load_maps(Some(handle.pid())).unwrap_or_else(|e| {
                tracing::debug!("Could not read mappings of pid {}: {}", handle.pid(), e);
                RegionTable::default()
            });
            RemoteRegions { handle, table }
        }
    }
}

impl RegionQuery for RemoteRegions<'_> {
    fn query(&self, address: Address) -> Option<RegionInfo> {
        #[cfg(target_os = "windows")]
        {
            if !self.handle.is_valid() {
                return None;
            }
            unsafe { kernel32::virtual_query_ex(self.handle.raw(), address.as_usize()) }
                .ok()
                .map(|mbi| MemoryBasicInfo::from(mbi).into())
        }
        #[cfg(target_os = "linux")]
        {
            self.table.query(address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::regions::enumerate_regions;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_local_regions_cover_heap_buffer() {
        let buffer = vec![0x5Au8; 0x4000];
        let start = Address::from(buffer.as_ptr());
        let end = start.saturating_add(buffer.len());

        let regions = enumerate_regions(LocalRegions::snapshot(), start, end);
        assert!(!regions.is_empty());
        assert_eq!(regions.first().unwrap().start, start);
        assert_eq!(regions.last().unwrap().end, end);
        assert_eq!(regions.iter().map(|r| r.len()).sum::<usize>(), buffer.len());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_remote_regions_of_self() {
        let handle = ProcessHandle::open_for_read(std::process::id()).unwrap();
        let buffer = vec![0xA5u8; 0x1000];
        let start = Address::from(buffer.as_ptr());

        let regions = enumerate_regions(
            RemoteRegions::snapshot(&handle),
            start,
            start.saturating_add(buffer.len()),
        );
        assert_eq!(regions.iter().map(|r| r.len()).sum::<usize>(), buffer.len());
    }

    #[test]
    fn test_local_query_of_null_page() {
        let regions = enumerate_regions(LocalRegions::snapshot(), Address::new(0), Address::new(0x1000));
        assert!(regions.is_empty());
    }
}

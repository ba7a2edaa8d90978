//! Memory module: signatures, region enumeration, reads and scanning
//!
//! - [`signature`] parses patterns into an anchor-accelerated matcher
//! - [`regions`] walks an address range and keeps what can be read
//! - [`reader`] copies bytes out of another address space
//! - [`scanner`] ties them together for local and remote scans

pub mod reader;
pub mod regions;
pub mod scanner;
pub mod signature;

pub use reader::MemoryRead;
pub use regions::{
    enumerate_regions, LocalRegions, ProtectionFlags, RegionEnumerator, RegionInfo, RegionQuery,
    RegionState, RegionTable, RemoteRegions,
};
pub use scanner::{scan_local_regions, scan_remote_regions, SignatureScanner};
pub use signature::{Matches, Signature};

use lazy_static::lazy_static;

lazy_static! {
    static ref PAGE_SIZE: usize = query_page_size();
}

fn query_page_size() -> usize {
    #[cfg(target_os = "windows")]
    {
        crate::windows::kernel32::page_size()
    }
    #[cfg(target_os = "linux")]
    {
        crate::linux::page_size()
    }
}

/// Size of a virtual memory page, queried from the OS once
pub fn page_size() -> usize {
    *PAGE_SIZE
}

//! Memory region enumeration
//!
//! A [`RegionQuery`] describes one address space region by region; the
//! [`RegionEnumerator`] walks a range with it and keeps only what a scan can
//! read. Concrete queries exist for the calling process, for another process
//! and for in-memory tables.

pub mod enumerator;
pub mod protection;
pub mod system;
pub mod table;

pub use enumerator::{enumerate_regions, RegionEnumerator, RegionInfo, RegionQuery};
pub use protection::ProtectionFlags;
pub use system::{LocalRegions, RemoteRegions};
pub use table::RegionTable;

/// State of a memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Memory is committed and accessible
    Committed,
    /// Memory is reserved but not committed
    Reserved,
    /// Memory is free/unallocated
    Free,
}

impl RegionState {
    pub const MEM_COMMIT: u32 = 0x1000;
    pub const MEM_RESERVE: u32 = 0x2000;
    pub const MEM_FREE: u32 = 0x10000;

    /// Decode a raw `MEM_*` state value; unknown values count as free
    pub fn from_raw(state: u32) -> Self {
        match state {
            Self::MEM_COMMIT => RegionState::Committed,
            Self::MEM_RESERVE => RegionState::Reserved,
            _ => RegionState::Free,
        }
    }
}

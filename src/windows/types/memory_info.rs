//! Conversion of MEMORY_BASIC_INFORMATION into region descriptors

use crate::core::types::Address;
use crate::memory::regions::{ProtectionFlags, RegionInfo, RegionState};
use winapi::um::winnt::MEMORY_BASIC_INFORMATION;

/// Owned copy of the fields of MEMORY_BASIC_INFORMATION the scanner uses
#[derive(Debug, Clone)]
pub struct MemoryBasicInfo {
    pub base_address: Address,
    pub region_size: usize,
    pub state: u32,
    pub protect: u32,
}

impl From<MEMORY_BASIC_INFORMATION> for MemoryBasicInfo {
    fn from(mbi: MEMORY_BASIC_INFORMATION) -> Self {
        MemoryBasicInfo {
            base_address: Address::new(mbi.BaseAddress as usize),
            region_size: mbi.RegionSize,
            state: mbi.State,
            protect: mbi.Protect,
        }
    }
}

impl From<MemoryBasicInfo> for RegionInfo {
    fn from(info: MemoryBasicInfo) -> Self {
        RegionInfo {
            base_address: info.base_address,
            size: info.region_size,
            state: RegionState::from_raw(info.state),
            protection: ProtectionFlags::new(info.protect),
        }
    }
}

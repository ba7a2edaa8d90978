//! Sorted snapshot of region descriptors

use crate::core::types::Address;
use crate::memory::regions::{RegionInfo, RegionQuery};

/// Region descriptors captured once and answered from memory.
///
/// Backs the procfs query on Linux and doubles as a fake address-space
/// layout in tests. Addresses not covered by any entry are gaps: a query
/// there answers with the next entry above.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: Vec<RegionInfo>,
}

impl RegionTable {
    /// Builds a table; entries are sorted by base address
    pub fn new(mut regions: Vec<RegionInfo>) -> Self {
        regions.sort_by_key(|r| r.base_address);
        RegionTable { regions }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Entries in ascending order
    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }
}

impl RegionQuery for RegionTable {
    fn query(&self, address: Address) -> Option<RegionInfo> {
        let index = self
            .regions
            .partition_point(|r| r.end_address() <= address);
        self.regions.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::regions::{ProtectionFlags, RegionState};

    fn info(base: usize, size: usize) -> RegionInfo {
        RegionInfo {
            base_address: Address::new(base),
            size,
            state: RegionState::Committed,
            protection: ProtectionFlags::read_write(),
        }
    }

    #[test]
    fn test_query_containing_region() {
        let table = RegionTable::new(vec![info(0x3000, 0x1000), info(0x1000, 0x1000)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.regions()[0].base_address, Address::new(0x1000));

        let hit = table.query(Address::new(0x1800)).unwrap();
        assert_eq!(hit.base_address, Address::new(0x1000));
    }

    #[test]
    fn test_query_in_gap_returns_next_region() {
        let table = RegionTable::new(vec![info(0x1000, 0x1000), info(0x3000, 0x1000)]);
        let hit = table.query(Address::new(0x2000)).unwrap();
        assert_eq!(hit.base_address, Address::new(0x3000));

        let hit = table.query(Address::new(0)).unwrap();
        assert_eq!(hit.base_address, Address::new(0x1000));
    }

    #[test]
    fn test_query_above_last_region() {
        let table = RegionTable::new(vec![info(0x1000, 0x1000)]);
        assert!(table.query(Address::new(0x2000)).is_none());
        assert!(RegionTable::default().query(Address::new(0)).is_none());
    }
}

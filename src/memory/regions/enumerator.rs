//! Walk of an address range yielding its scannable regions

use tracing::trace;

use crate::core::types::{Address, MemoryRegion};
use crate::memory::regions::{ProtectionFlags, RegionState};

/// Raw answer to a region query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    /// Base address of the region
    pub base_address: Address,
    /// Size of the region in bytes
    pub size: usize,
    /// Current state of the region
    pub state: RegionState,
    /// Protection flags for the region
    pub protection: ProtectionFlags,
}

impl RegionInfo {
    /// Get the end address of the region
    pub fn end_address(&self) -> Address {
        self.base_address.saturating_add(self.size)
    }

    /// Check if an address is within this region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Committed, readable and not a guard page
    pub fn is_scannable(&self) -> bool {
        self.state == RegionState::Committed
            && self.protection.is_readable()
            && !self.protection.is_guard()
    }
}

/// Source of region descriptors for one address space
pub trait RegionQuery {
    /// Describes the region containing `address`, or the closest region
    /// above it. `None` ends the walk (end of the address space, or the
    /// target became inaccessible).
    fn query(&self, address: Address) -> Option<RegionInfo>;
}

impl<Q: RegionQuery + ?Sized> RegionQuery for &Q {
    fn query(&self, address: Address) -> Option<RegionInfo> {
        (**self).query(address)
    }
}

/// Enumerates the scannable regions of `[begin, end)` in ascending order,
/// each clipped to the range.
pub struct RegionEnumerator<Q> {
    query: Q,
    begin: Address,
    end: Address,
    cursor: Address,
    done: bool,
}

impl<Q: RegionQuery> RegionEnumerator<Q> {
    /// Create a new region enumerator over `[begin, end)`
    pub fn new(query: Q, begin: Address, end: Address) -> Self {
        RegionEnumerator {
            query,
            begin,
            end,
            cursor: begin,
            done: false,
        }
    }

    /// Get the next scannable region
    pub fn next_region(&mut self) -> Option<MemoryRegion> {
        while !self.done && self.cursor < self.end {
            let Some(info) = self.query.query(self.cursor) else {
                self.done = true;
                break;
            };

            let region_end = info.end_address();
            if region_end <= self.cursor {
                // A descriptor that does not move the cursor forward would loop forever
                self.done = true;
                break;
            }

            let start = self.cursor.max(info.base_address);
            self.cursor = region_end;

            if !info.is_scannable() {
                trace!(
                    "Skipping {:?} region at {} ({} bytes, {})",
                    info.state, info.base_address, info.size, info.protection
                );
                continue;
            }
            if let Some(region) = MemoryRegion::new(start, region_end).clip(self.begin, self.end) {
                return Some(region);
            }
        }

        None
    }
}

impl<Q: RegionQuery> Iterator for RegionEnumerator<Q> {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_region()
    }
}

/// Collects the scannable regions of `[begin, end)`
pub fn enumerate_regions<Q: RegionQuery>(
    query: Q,
    begin: Address,
    end: Address,
) -> Vec<MemoryRegion> {
    RegionEnumerator::new(query, begin, end).collect()
}

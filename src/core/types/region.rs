//! Readable memory span produced by region enumeration

use super::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open interval `[start, end)` that was committed, readable and not a
/// guard page when it was queried. Only a snapshot: the memory may change
/// state before it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: Address,
    pub end: Address,
}

impl MemoryRegion {
    /// Creates a region; an inverted interval collapses to an empty one at `start`
    pub fn new(start: Address, end: Address) -> Self {
        MemoryRegion {
            start,
            end: end.max(start),
        }
    }

    /// Creates a region from a base address and a length
    pub fn from_base_size(base: Address, size: usize) -> Self {
        MemoryRegion::new(base, base.saturating_add(size))
    }

    /// Length of the region in bytes
    pub fn len(&self) -> usize {
        self.end.distance_from(self.start)
    }

    /// Whether the region covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `address` lies inside the region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }

    /// Intersection with `[begin, end)`, or `None` if nothing is left
    pub fn clip(&self, begin: Address, end: Address) -> Option<MemoryRegion> {
        let start = self.start.max(begin);
        let stop = self.end.min(end);
        (start < stop).then(|| MemoryRegion { start, end: stop })
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

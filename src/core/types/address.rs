//! Memory address wrapper type with hex parsing and alignment helpers

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A virtual address in the local or a remote address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the address is aligned to the specified boundary
    pub const fn is_aligned(&self, alignment: usize) -> bool {
        alignment != 0 && self.0 % alignment == 0
    }

    /// Aligns the address down to the specified power-of-two boundary
    pub const fn align_down(&self, alignment: usize) -> Self {
        if alignment == 0 {
            return *self;
        }
        Address(self.0 & !(alignment - 1))
    }

    /// Aligns the address up to the specified power-of-two boundary
    pub const fn align_up(&self, alignment: usize) -> Self {
        if alignment == 0 {
            return *self;
        }
        Address(self.0.saturating_add(alignment - 1) & !(alignment - 1))
    }

    /// First page boundary strictly above this address, saturating at the
    /// top of the address space.
    pub const fn next_page_boundary(&self, page_size: usize) -> Self {
        if page_size == 0 {
            return Address(self.0.saturating_add(1));
        }
        match self.0.checked_add(page_size) {
            Some(next) => Address(next & !(page_size - 1)),
            None => Address(usize::MAX),
        }
    }

    /// Adds a byte count, returning `None` on overflow
    pub const fn checked_add(&self, count: usize) -> Option<Self> {
        match self.0.checked_add(count) {
            Some(value) => Some(Address(value)),
            None => None,
        }
    }

    /// Adds a byte count, saturating at the top of the address space
    pub const fn saturating_add(&self, count: usize) -> Self {
        Address(self.0.saturating_add(count))
    }

    /// Distance in bytes from `other` up to this address (0 if `other` is above)
    pub const fn distance_from(&self, other: Address) -> usize {
        self.0.saturating_sub(other.0)
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Returns the address as a pointer
    pub const fn as_ptr<T>(&self) -> *const T {
        self.0 as *const T
    }
}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> MemoryResult<Self> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            usize::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            usize::from_str_radix(s, 16)
        } else {
            s.parse::<usize>()
        };

        value
            .map(Address::new)
            .map_err(|_| MemoryError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

impl From<Address> for usize {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl<T> From<*const T> for Address {
    fn from(ptr: *const T) -> Self {
        Address::new(ptr as usize)
    }
}

//! Page protection flags
//!
//! Uses the Windows `PAGE_*` vocabulary on every platform; the Linux backend
//! translates `rwxp` permission strings into the same values.

/// Memory protection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtectionFlags {
    value: u32,
}

impl ProtectionFlags {
    // Protection constants
    pub const PAGE_NOACCESS: u32 = 0x01;
    pub const PAGE_READONLY: u32 = 0x02;
    pub const PAGE_READWRITE: u32 = 0x04;
    pub const PAGE_WRITECOPY: u32 = 0x08;
    pub const PAGE_EXECUTE: u32 = 0x10;
    pub const PAGE_EXECUTE_READ: u32 = 0x20;
    pub const PAGE_EXECUTE_READWRITE: u32 = 0x40;
    pub const PAGE_EXECUTE_WRITECOPY: u32 = 0x80;
    pub const PAGE_GUARD: u32 = 0x100;
    pub const PAGE_NOCACHE: u32 = 0x200;
    pub const PAGE_WRITECOMBINE: u32 = 0x400;

    const READABLE_MASK: u32 = Self::PAGE_READONLY
        | Self::PAGE_READWRITE
        | Self::PAGE_WRITECOPY
        | Self::PAGE_EXECUTE_READ
        | Self::PAGE_EXECUTE_READWRITE
        | Self::PAGE_EXECUTE_WRITECOPY;

    /// Create new protection flags
    pub const fn new(value: u32) -> Self {
        ProtectionFlags { value }
    }

    /// No access protection
    pub const fn no_access() -> Self {
        ProtectionFlags::new(Self::PAGE_NOACCESS)
    }

    /// Read-only protection
    pub const fn read_only() -> Self {
        ProtectionFlags::new(Self::PAGE_READONLY)
    }

    /// Read-write protection
    pub const fn read_write() -> Self {
        ProtectionFlags::new(Self::PAGE_READWRITE)
    }

    /// Execute-read protection
    pub const fn execute_read() -> Self {
        ProtectionFlags::new(Self::PAGE_EXECUTE_READ)
    }

    /// Translates a procfs `rwxp` permission string
    pub fn from_unix_permissions(perms: &str) -> Self {
        let perms = perms.as_bytes();
        let flag = |i: usize, c: u8| perms.get(i) == Some(&c);

        let value = match (flag(0, b'r'), flag(1, b'w'), flag(2, b'x')) {
            (true, false, false) => Self::PAGE_READONLY,
            (true, true, false) => Self::PAGE_READWRITE,
            (true, false, true) => Self::PAGE_EXECUTE_READ,
            (true, true, true) => Self::PAGE_EXECUTE_READWRITE,
            (false, _, true) => Self::PAGE_EXECUTE,
            (false, _, false) => Self::PAGE_NOACCESS,
        };
        ProtectionFlags::new(value)
    }

    /// Whether any of the six readable protections is present
    pub fn is_readable(&self) -> bool {
        (self.value & Self::READABLE_MASK) != 0
    }

    /// Check if guard page flag is set
    pub fn is_guard(&self) -> bool {
        (self.value & Self::PAGE_GUARD) != 0
    }

    /// Get the raw protection value
    pub fn raw(&self) -> u32 {
        self.value
    }

    fn format_string(&self) -> String {
        let base = match self.value & 0xFF {
            Self::PAGE_NOACCESS => "NOACCESS",
            Self::PAGE_READONLY => "R",
            Self::PAGE_READWRITE => "RW",
            Self::PAGE_WRITECOPY => "WC",
            Self::PAGE_EXECUTE => "X",
            Self::PAGE_EXECUTE_READ => "RX",
            Self::PAGE_EXECUTE_READWRITE => "RWX",
            Self::PAGE_EXECUTE_WRITECOPY => "WCX",
            _ => "UNKNOWN",
        };

        let mut flags = String::from(base);
        if self.is_guard() {
            flags.push_str("+G");
        }
        if (self.value & Self::PAGE_NOCACHE) != 0 {
            flags.push_str("+NC");
        }
        flags
    }
}

impl std::fmt::Display for ProtectionFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_protections() {
        for value in [
            ProtectionFlags::PAGE_READONLY,
            ProtectionFlags::PAGE_READWRITE,
            ProtectionFlags::PAGE_WRITECOPY,
            ProtectionFlags::PAGE_EXECUTE_READ,
            ProtectionFlags::PAGE_EXECUTE_READWRITE,
            ProtectionFlags::PAGE_EXECUTE_WRITECOPY,
        ] {
            assert!(ProtectionFlags::new(value).is_readable(), "0x{value:X}");
        }

        assert!(!ProtectionFlags::no_access().is_readable());
        assert!(!ProtectionFlags::new(ProtectionFlags::PAGE_EXECUTE).is_readable());
        assert!(!ProtectionFlags::new(0).is_readable());
    }

    #[test]
    fn test_guard_flag() {
        let guarded =
            ProtectionFlags::new(ProtectionFlags::PAGE_READWRITE | ProtectionFlags::PAGE_GUARD);
        assert!(guarded.is_guard());
        assert!(guarded.is_readable());
        assert_eq!(guarded.raw(), 0x104);
        assert!(!ProtectionFlags::read_write().is_guard());
    }

    #[test]
    fn test_from_unix_permissions() {
        assert_eq!(
            ProtectionFlags::from_unix_permissions("r--p"),
            ProtectionFlags::read_only()
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions("rw-p"),
            ProtectionFlags::read_write()
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions("r-xp"),
            ProtectionFlags::execute_read()
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions("rwxs").raw(),
            ProtectionFlags::PAGE_EXECUTE_READWRITE
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions("--xp").raw(),
            ProtectionFlags::PAGE_EXECUTE
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions("---p"),
            ProtectionFlags::no_access()
        );
        assert_eq!(
            ProtectionFlags::from_unix_permissions(""),
            ProtectionFlags::no_access()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ProtectionFlags::read_write().to_string(), "RW");
        assert_eq!(ProtectionFlags::execute_read().to_string(), "RX");
        let guarded =
            ProtectionFlags::new(ProtectionFlags::PAGE_READWRITE | ProtectionFlags::PAGE_GUARD);
        assert_eq!(guarded.to_string(), "RW+G");
        let uncached =
            ProtectionFlags::new(ProtectionFlags::PAGE_READONLY | ProtectionFlags::PAGE_NOCACHE);
        assert_eq!(uncached.to_string(), "R+NC");
        assert_eq!(ProtectionFlags::no_access().to_string(), "NOACCESS");
    }
}

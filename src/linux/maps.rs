//! `/proc/<pid>/maps` parsing

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::regions::{ProtectionFlags, RegionInfo, RegionState, RegionTable};
use std::fs;

/// Mappings that are listed readable but fault when touched
const UNREADABLE_SPECIAL: &[&str] = &["[vvar]", "[vvar_vclock]"];

/// Loads the mappings of `pid`, or of the calling process for `None`
pub fn load_maps(pid: Option<ProcessId>) -> MemoryResult<RegionTable> {
    let path = match pid {
        Some(pid) => format!("/proc/{}/maps", pid),
        None => "/proc/self/maps".to_string(),
    };
    let contents = fs::read_to_string(&path)?;
    parse_maps(&contents)
}

/// Parses the contents of a maps file
pub fn parse_maps(contents: &str) -> MemoryResult<RegionTable> {
    let regions = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect::<MemoryResult<Vec<_>>>()?;
    Ok(RegionTable::new(regions))
}

fn parse_line(line: &str) -> MemoryResult<RegionInfo> {
    let malformed = || MemoryError::OsError(format!("malformed maps line: {:?}", line));

    let mut fields = line.split_whitespace();
    let range = fields.next().ok_or_else(malformed)?;
    let perms = fields.next().ok_or_else(malformed)?;
    // offset, device, inode
    let path = fields.nth(3).unwrap_or("");

    let (start, end) = range.split_once('-').ok_or_else(malformed)?;
    let start = usize::from_str_radix(start, 16).map_err(|_| malformed())?;
    let end = usize::from_str_radix(end, 16).map_err(|_| malformed())?;
    if end < start {
        return Err(malformed());
    }

    let protection = if UNREADABLE_SPECIAL.contains(&path) {
        ProtectionFlags::no_access()
    } else {
        ProtectionFlags::from_unix_permissions(perms)
    };

    Ok(RegionInfo {
        base_address: Address::new(start),
        size: end - start,
        state: RegionState::Committed,
        protection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::regions::RegionQuery;

    const SAMPLE: &str = "\
55d0c8a00000-55d0c8a02000 r--p 00000000 08:01 1311 /usr/bin/cat
55d0c8a02000-55d0c8a07000 r-xp 00002000 08:01 1311 /usr/bin/cat
55d0c8a0c000-55d0c8a0d000 rw-p 0000b000 08:01 1311 /usr/bin/cat
55d0ca1b5000-55d0ca1d6000 rw-p 00000000 00:00 0    [heap]
7ffd2b1f0000-7ffd2b1f1000 ---p 00000000 00:00 0
7ffd2b1f1000-7ffd2b212000 rw-p 00000000 00:00 0    [stack]
7ffd2b3e4000-7ffd2b3e8000 r--p 00000000 00:00 0    [vvar]
7ffd2b3e8000-7ffd2b3ea000 r-xp 00000000 00:00 0    [vdso]
ffffffffff600000-ffffffffff601000 --xp 00000000 00:00 0 [vsyscall]
";

    #[test]
    fn test_parse_sample() {
        let table = parse_maps(SAMPLE).unwrap();
        assert_eq!(table.len(), 9);

        let first = &table.regions()[0];
        assert_eq!(first.base_address, Address::new(0x55d0c8a00000));
        assert_eq!(first.size, 0x2000);
        assert_eq!(first.state, RegionState::Committed);
        assert_eq!(first.protection, ProtectionFlags::read_only());
    }

    #[test]
    fn test_scannable_entries() {
        let table = parse_maps(SAMPLE).unwrap();
        let scannable: Vec<_> = table
            .regions()
            .iter()
            .filter(|r| r.is_scannable())
            .map(|r| r.base_address.as_usize())
            .collect();
        assert_eq!(
            scannable,
            vec![
                0x55d0c8a00000,
                0x55d0c8a02000,
                0x55d0c8a0c000,
                0x55d0ca1b5000,
                0x7ffd2b1f1000,
                0x7ffd2b3e8000,
            ]
        );
    }

    #[test]
    fn test_gap_queries_next_mapping() {
        let table = parse_maps(SAMPLE).unwrap();
        let next = table.query(Address::new(0x55d0c8a07000)).unwrap();
        assert_eq!(next.base_address, Address::new(0x55d0c8a0c000));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_maps("zzzz-1000 r--p 0 0:0 0\n").is_err());
        assert!(parse_maps("1000\n").is_err());
        assert!(parse_maps("2000-1000 r--p 0 0:0 0\n").is_err());
        assert!(parse_maps("").unwrap().is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_load_own_maps() {
        let table = load_maps(None).unwrap();
        let local = vec![0u8; 64];
        let hit = table.query(Address::new(local.as_ptr() as usize)).unwrap();
        assert!(hit.contains(Address::new(local.as_ptr() as usize)));
        assert!(hit.is_scannable());
    }

    #[test]
    fn test_load_missing_process() {
        let result = load_maps(Some(u32::MAX));
        assert!(matches!(result, Err(MemoryError::Io(_))));
    }
}

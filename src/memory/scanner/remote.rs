//! Windowed scanning of another address space through bulk reads
//!
//! Each region is copied in windows of at most `chunk_size + size - 1` bytes. Two
//! consecutive windows overlap by `size - 1` bytes so an occurrence that
//! straddles a window edge is seen whole by the later window. A read that
//! fails, or returns less than one pattern's worth of bytes, moves the
//! cursor to the next page boundary instead of abandoning the region.

use std::ops::ControlFlow;

use tracing::trace;

use crate::config::{ScannerConfig, MAX_CHUNK_SIZE};
use crate::core::types::{Address, MemoryRegion};
use crate::memory::reader::MemoryRead;
use crate::memory::scanner::{collect_matches, nth_match};
use crate::memory::signature::Signature;

/// Window geometry for remote scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    /// Bytes per read before the overlap is added
    pub chunk_size: usize,
    /// Granularity of the skip after a failed read
    pub page_size: usize,
}

impl WindowOptions {
    /// Chunk size is clamped to `[1, MAX_CHUNK_SIZE]`, page size to at least 1
    pub fn new(chunk_size: usize, page_size: usize) -> Self {
        WindowOptions {
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
            page_size: page_size.max(1),
        }
    }

    /// Geometry from the scanner configuration, asking the OS for the page
    /// size when it is not configured
    pub fn from_config(config: &ScannerConfig) -> Self {
        WindowOptions::new(config.chunk_size, config.effective_page_size())
    }
}

/// Feeds every match inside `regions` to `visit`, in ascending address order.
pub(crate) fn visit_remote_matches<I, R, F>(
    regions: I,
    reader: R,
    signature: &Signature,
    options: WindowOptions,
    mut visit: F,
) -> ControlFlow<()>
where
    I: IntoIterator<Item = MemoryRegion>,
    R: MemoryRead,
    F: FnMut(Address) -> ControlFlow<()>,
{
    let size = signature.size();
    if size == 0 {
        return ControlFlow::Continue(());
    }

    let window = options.chunk_size.saturating_add(size - 1);
    let mut buffer = Vec::new();
    for region in regions {
        if region.len() < size {
            continue;
        }
        if signature.is_wildcard_only() {
            visit(region.start)?;
            continue;
        }

        // Never larger than the biggest region seen so far
        let needed = window.min(region.len());
        if buffer.len() < needed {
            buffer.resize(needed, 0);
        }
        scan_region(region, &reader, signature, options, &mut buffer, &mut visit)?;
    }

    ControlFlow::Continue(())
}

fn scan_region<R, F>(
    region: MemoryRegion,
    reader: &R,
    signature: &Signature,
    options: WindowOptions,
    buffer: &mut [u8],
    visit: &mut F,
) -> ControlFlow<()>
where
    R: MemoryRead,
    F: FnMut(Address) -> ControlFlow<()>,
{
    let size = signature.size();
    let mut cursor = region.start;

    while cursor < region.end {
        let wanted = buffer.len().min(region.end.distance_from(cursor));
        if wanted < size {
            break;
        }

        let read = match reader.read_memory(cursor, &mut buffer[..wanted]) {
            Ok(read) if read >= size => read.min(wanted),
            Ok(read) => {
                trace!("Short read of {} bytes at {}, skipping to next page", read, cursor);
                cursor = cursor.next_page_boundary(options.page_size);
                continue;
            }
            Err(e) => {
                trace!("Read failed at {}: {}, skipping to next page", cursor, e);
                cursor = cursor.next_page_boundary(options.page_size);
                continue;
            }
        };

        for offset in signature.matches(&buffer[..read]) {
            visit(cursor.saturating_add(offset))?;
        }

        if cursor.saturating_add(read) >= region.end {
            break;
        }
        // read >= size, so the window always moves forward
        cursor = cursor.saturating_add(read - (size - 1));
    }

    ControlFlow::Continue(())
}

/// Returns the `(skip + 1)`-th match of `signature` in `regions`, reading
/// the bytes through `reader`.
pub fn scan_remote_regions<I, R>(
    regions: I,
    reader: R,
    signature: &Signature,
    skip: usize,
    options: WindowOptions,
) -> Option<Address>
where
    I: IntoIterator<Item = MemoryRegion>,
    R: MemoryRead,
{
    nth_match(skip, |visit| {
        visit_remote_matches(regions, reader, signature, options, visit)
    })
}

/// Collects up to `limit` matches of `signature` in `regions`.
pub fn collect_remote_matches<I, R>(
    regions: I,
    reader: R,
    signature: &Signature,
    limit: usize,
    options: WindowOptions,
) -> Vec<Address>
where
    I: IntoIterator<Item = MemoryRegion>,
    R: MemoryRead,
{
    collect_matches(limit, |visit| {
        visit_remote_matches(regions, reader, signature, options, visit)
    })
}

//! In-process scanning over directly addressable memory

use std::ops::ControlFlow;
use std::slice;

use crate::core::types::{Address, MemoryRegion};
use crate::memory::scanner::{collect_matches, nth_match};
use crate::memory::signature::Signature;

/// Feeds every match inside `regions` to `visit`, in ascending address order.
///
/// Regions shorter than the signature are skipped. A wildcard-only signature
/// reports the start of each region it fits in and reads nothing.
///
/// # Safety
/// Every region must be readable memory of the calling process for the
/// whole duration of the call.
pub(crate) unsafe fn visit_local_matches<I, F>(
    regions: I,
    signature: &Signature,
    mut visit: F,
) -> ControlFlow<()>
where
    I: IntoIterator<Item = MemoryRegion>,
    F: FnMut(Address) -> ControlFlow<()>,
{
    let size = signature.size();
    if size == 0 {
        return ControlFlow::Continue(());
    }

    for region in regions {
        if region.len() < size {
            continue;
        }
        if signature.is_wildcard_only() {
            visit(region.start)?;
            continue;
        }

        let bytes = slice::from_raw_parts(region.start.as_ptr::<u8>(), region.len());
        for offset in signature.matches(bytes) {
            visit(region.start.saturating_add(offset))?;
        }
    }

    ControlFlow::Continue(())
}

/// Returns the `(skip + 1)`-th match of `signature` in `regions`.
///
/// # Safety
/// Every region must be readable memory of the calling process for the
/// whole duration of the call.
pub unsafe fn scan_local_regions<I>(regions: I, signature: &Signature, skip: usize) -> Option<Address>
where
    I: IntoIterator<Item = MemoryRegion>,
{
    nth_match(skip, |visit| visit_local_matches(regions, signature, visit))
}

/// Collects up to `limit` matches of `signature` in `regions`.
///
/// # Safety
/// Same contract as [`scan_local_regions`].
pub unsafe fn collect_local_matches<I>(regions: I, signature: &Signature, limit: usize) -> Vec<Address>
where
    I: IntoIterator<Item = MemoryRegion>,
{
    collect_matches(limit, |visit| visit_local_matches(regions, signature, visit))
}

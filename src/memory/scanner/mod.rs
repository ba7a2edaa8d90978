//! Signature scanning over the calling process or a remote one
//!
//! The pattern is parsed once, then matched region by region in ascending
//! address order. Local scans borrow the mapped memory directly; remote scans
//! copy it window by window through [`MemoryRead`](crate::memory::MemoryRead).

pub mod local;
pub mod remote;

pub use local::{collect_local_matches, scan_local_regions};
pub use remote::{collect_remote_matches, scan_remote_regions, WindowOptions};

use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::config::{ConfigResult, ConfigValidator, ScannerConfig};
use crate::core::types::{Address, MemoryError, MemoryRegion, MemoryResult};
use crate::memory::regions::{LocalRegions, RegionEnumerator, RemoteRegions};
use crate::memory::signature::Signature;
use crate::process::ProcessHandle;

type Visitor<'v> = &'v mut dyn FnMut(Address) -> ControlFlow<()>;

/// Runs `walk` until it has produced `skip + 1` matches and returns the last one
pub(crate) fn nth_match<W>(skip: usize, walk: W) -> Option<Address>
where
    W: FnOnce(Visitor<'_>) -> ControlFlow<()>,
{
    let mut remaining = skip;
    let mut found = None;
    let _ = walk(&mut |address| {
        if remaining == 0 {
            found = Some(address);
            return ControlFlow::Break(());
        }
        remaining -= 1;
        ControlFlow::Continue(())
    });
    found
}

/// Runs `walk` until it has produced `limit` matches, keeping all of them
pub(crate) fn collect_matches<W>(limit: usize, walk: W) -> Vec<Address>
where
    W: FnOnce(Visitor<'_>) -> ControlFlow<()>,
{
    let mut found = Vec::new();
    if limit == 0 {
        return found;
    }
    let _ = walk(&mut |address| {
        found.push(address);
        if found.len() >= limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

/// Scan session over `[start, end)` of the calling process, and optionally of
/// a remote process.
///
/// The `find*` methods report malformed patterns and inverted ranges as
/// errors and a miss as `Ok(None)`. `scan` and `scan_ex` fold everything
/// into the `0` sentinel.
#[derive(Debug, Clone)]
pub struct SignatureScanner<'a> {
    start: Address,
    end: Address,
    process: Option<&'a ProcessHandle>,
    config: ScannerConfig,
}

impl<'a> SignatureScanner<'a> {
    /// Scanner over a range of the calling process.
    ///
    /// Local scans read the mapped memory in place. On Linux, touching a
    /// file-backed mapping beyond the end of its file raises `SIGBUS`, so keep
    /// the range clear of files that may be truncated while scanning.
    pub fn new(start: Address, end: Address) -> Self {
        SignatureScanner {
            start,
            end,
            process: None,
            config: ScannerConfig::default(),
        }
    }

    /// Scanner over a range of the process behind `handle`.
    ///
    /// The handle must already carry query and read rights.
    pub fn with_process(handle: &'a ProcessHandle, start: Address, end: Address) -> Self {
        SignatureScanner {
            process: Some(handle),
            ..SignatureScanner::new(start, end)
        }
    }

    /// Replace the scanner configuration after validating it
    pub fn with_config(mut self, config: ScannerConfig) -> ConfigResult<Self> {
        ConfigValidator::validate_scanner(&config)?;
        self.config = config;
        Ok(self)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Address of the `(skip + 1)`-th local match of `pattern`.
    ///
    /// Reads the range in place; see [`SignatureScanner::new`] for the
    /// `SIGBUS` hazard of truncated file mappings on Linux.
    pub fn find(&self, pattern: &str, skip: usize) -> MemoryResult<Option<Address>> {
        let signature = Signature::parse(pattern)?;
        self.find_signature(&signature, skip)
    }

    /// Address of the `(skip + 1)`-th match of `pattern` in the remote process
    pub fn find_ex(&self, pattern: &str, skip: usize) -> MemoryResult<Option<Address>> {
        let signature = Signature::parse(pattern)?;
        self.find_signature_ex(&signature, skip)
    }

    /// Local scan with a signature parsed beforehand
    pub fn find_signature(
        &self,
        signature: &Signature,
        skip: usize,
    ) -> MemoryResult<Option<Address>> {
        self.check_range()?;
        if signature.is_empty() {
            return Ok(None);
        }

        let regions = self.local_regions();
        // SAFETY: every region was committed and readable when it was queried
        let found = unsafe { scan_local_regions(regions, signature, skip) };
        debug!(
            "Local scan of [{}, {}) for {} (skip {}): {:?}",
            self.start, self.end, signature, skip, found
        );
        Ok(found)
    }

    /// Remote scan with a signature parsed beforehand
    pub fn find_signature_ex(
        &self,
        signature: &Signature,
        skip: usize,
    ) -> MemoryResult<Option<Address>> {
        self.check_range()?;
        if signature.is_empty() {
            return Ok(None);
        }
        let Some(handle) = self.remote_handle() else {
            return Ok(None);
        };

        let regions = RegionEnumerator::new(RemoteRegions::snapshot(handle), self.start, self.end);
        let found = scan_remote_regions(regions, handle, signature, skip, self.window_options());
        debug!(
            "Remote scan of {} in [{}, {}) for {} (skip {}): {:?}",
            handle, self.start, self.end, signature, skip, found
        );
        Ok(found)
    }

    /// Every local match of `pattern`, capped at `max_results`
    pub fn find_all(&self, pattern: &str) -> MemoryResult<Vec<Address>> {
        let signature = Signature::parse(pattern)?;
        self.check_range()?;
        if signature.is_empty() {
            return Ok(Vec::new());
        }

        let regions = self.local_regions();
        // SAFETY: every region was committed and readable when it was queried
        let found =
            unsafe { collect_local_matches(regions, &signature, self.config.max_results) };
        debug!("Local scan for {} found {} matches", signature, found.len());
        Ok(found)
    }

    /// Every remote match of `pattern`, capped at `max_results`
    pub fn find_all_ex(&self, pattern: &str) -> MemoryResult<Vec<Address>> {
        let signature = Signature::parse(pattern)?;
        self.check_range()?;
        if signature.is_empty() {
            return Ok(Vec::new());
        }
        let Some(handle) = self.remote_handle() else {
            return Ok(Vec::new());
        };

        let regions = RegionEnumerator::new(RemoteRegions::snapshot(handle), self.start, self.end);
        let found = collect_remote_matches(
            regions,
            handle,
            &signature,
            self.config.max_results,
            self.window_options(),
        );
        debug!("Remote scan for {} found {} matches", signature, found.len());
        Ok(found)
    }

    /// Local scan returning the match address, or 0 when there is none
    pub fn scan(&self, pattern: &str, skip: usize) -> usize {
        Self::sentinel(self.find(pattern, skip))
    }

    /// Remote scan returning the match address, or 0 when there is none
    pub fn scan_ex(&self, pattern: &str, skip: usize) -> usize {
        Self::sentinel(self.find_ex(pattern, skip))
    }

    fn sentinel(result: MemoryResult<Option<Address>>) -> usize {
        match result {
            Ok(found) => found.map_or(0, |address| address.as_usize()),
            Err(e) => {
                warn!("Signature scan failed: {}", e);
                0
            }
        }
    }

    fn check_range(&self) -> MemoryResult<()> {
        if self.start > self.end {
            return Err(MemoryError::invalid_range(self.start, self.end));
        }
        Ok(())
    }

    fn local_regions(&self) -> Vec<MemoryRegion> {
        let regions: Vec<_> =
            RegionEnumerator::new(LocalRegions::snapshot(), self.start, self.end).collect();
        debug!("{} readable regions in [{}, {})", regions.len(), self.start, self.end);
        regions
    }

    fn remote_handle(&self) -> Option<&'a ProcessHandle> {
        match self.process {
            Some(handle) if handle.is_valid() => Some(handle),
            _ => {
                debug!("Remote scan without a usable process handle");
                None
            }
        }
    }

    fn window_options(&self) -> WindowOptions {
        WindowOptions::from_config(&self.config)
    }
}

//! Page cache residency probe.
//!
//! This module provides:
//! - `Probe`: opens a file, validates it and produces a `ResidencyReport`
//! - `ResidencyBackend`: the kernel query behind the probe, swappable
//! - `mincore`: the Linux/Unix backend (mmap + mincore)

pub mod mincore;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::ProbeError;
use crate::report::ResidencyReport;

pub use mincore::MincoreBackend;

/// Fallback when sysconf cannot report a page size.
const DEFAULT_PAGE_SIZE: usize = 4096;

/// Get the kernel page size in bytes.
fn get_page_size() -> usize {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_PAGESIZE
        // Returns -1 on error - handled by the > 0 check
        unsafe {
            let size = libc::sysconf(libc::_SC_PAGESIZE);
            if size > 0 {
                return size as usize;
            }
        }
    }
    DEFAULT_PAGE_SIZE
}

/// Kernel page size, queried once.
pub static PAGE_SIZE: Lazy<usize> = Lazy::new(get_page_size);

/// Number of pages spanned by `size` bytes (rounded up).
pub fn page_count(size: u64, page_size: usize) -> usize {
    size.div_ceil(page_size as u64) as usize
}

/// Residency bitmap of one file together with the moment it was read.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub residency: Vec<bool>,
    pub captured_at: DateTime<Utc>,
}

/// A kernel facility that reports which pages of an open file are resident.
///
/// Implementations must not change cache state, and must release any
/// mapping they create before returning.
pub trait ResidencyBackend {
    /// Queries residency for the first `len` bytes of `file`; `len` is
    /// non-zero. The returned bitmap has exactly `page_count(len)` entries.
    fn snapshot(&self, file: &File, len: u64) -> Result<Snapshot, ProbeError>;
}

/// Probes files through a `ResidencyBackend`.
#[derive(Debug, Default, Clone)]
pub struct Probe<B = MincoreBackend> {
    backend: B,
}

impl Probe<MincoreBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: ResidencyBackend> Probe<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Builds the report for `path`. The report name is the path as given.
    pub fn probe(&self, path: impl AsRef<Path>) -> Result<ResidencyReport, ProbeError> {
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();

        let file = File::open(path).map_err(|e| ProbeError::from_io(path, e))?;
        let meta = file.metadata().map_err(|e| ProbeError::from_io(path, e))?;

        if meta.is_dir() {
            return Err(ProbeError::InvalidTarget {
                path: path.to_path_buf(),
                reason: "file is a directory",
            });
        }

        let size = meta.len();
        let modified_at = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| ProbeError::from_io(path, e))?;

        // Mapping a zero-length region is an error on Linux
        if size == 0 {
            debug!("{}: empty file, skipping residency query", name);
            return Ok(ResidencyReport::new(
                name,
                0,
                Utc::now(),
                modified_at,
                Vec::new(),
            ));
        }

        let snapshot = self.backend.snapshot(&file, size)?;
        debug!(
            "{}: {} bytes, {} pages queried",
            name,
            size,
            snapshot.residency.len()
        );

        Ok(ResidencyReport::new(
            name,
            size,
            snapshot.captured_at,
            modified_at,
            snapshot.residency,
        ))
    }
}

/// Probes `path` with the default mincore backend.
pub fn probe(path: impl AsRef<Path>) -> Result<ResidencyReport, ProbeError> {
    Probe::new().probe(path)
}

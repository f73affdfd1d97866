//! mincore(2) residency backend.
//!
//! The file is mapped private and read-only, `mincore` reports one byte per
//! page of the mapping, and the low bit of each byte is the residency flag.
//! `mincore` only inspects page tables and the page cache; it never faults a
//! page in. The mapping is an `Mmap` and is unmapped when it goes out of
//! scope, on every return path.

use chrono::Utc;
use memmap2::MmapOptions;
use std::fs::File;
use std::io;
use tracing::trace;

use super::{page_count, ResidencyBackend, Snapshot, PAGE_SIZE};
use crate::error::ProbeError;

/// Residency via `mmap` + `mincore`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MincoreBackend;

impl ResidencyBackend for MincoreBackend {
    fn snapshot(&self, file: &File, len: u64) -> Result<Snapshot, ProbeError> {
        let map_len = usize::try_from(len).map_err(|_| ProbeError::TooLarge(len))?;

        // SAFETY: the mapping is read-only and private and its bytes are never
        // dereferenced; only its address range is handed to mincore.
        let map = unsafe { MmapOptions::new().len(map_len).map_copy_read_only(file) }
            .map_err(ProbeError::Map)?;

        let pages = page_count(len, *PAGE_SIZE);
        let mut vec = vec![0u8; pages];

        let captured_at = Utc::now();
        // SAFETY: `vec` holds one byte per page of the mapping, which is what
        // mincore writes for a `map.len()` byte range starting at a page
        // aligned address.
        let ret = unsafe {
            libc::mincore(
                map.as_ptr() as *mut libc::c_void,
                map.len(),
                vec.as_mut_ptr() as _,
            )
        };
        if ret != 0 {
            return Err(ProbeError::Residency(io::Error::last_os_error()));
        }
        drop(map);

        trace!("mincore returned {} page entries", vec.len());

        Ok(Snapshot {
            residency: vec.iter().map(|b| b & 0x1 == 1).collect(),
            captured_at,
        })
    }
}

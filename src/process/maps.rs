//! Memory-map table parsing for a running process.
//!
//! Each line of `/proc/<pid>/maps` describes one region:
//!
//! ```text
//! 7f3c1a200000-7f3c1a228000 r--p 00000000 08:01 1835049   /usr/lib/x86_64-linux-gnu/libc.so.6
//! 7ffd5b9e4000-7ffd5ba05000 rw-p 00000000 00:00 0         [stack]
//! ```
//!
//! Only lines with exactly six fields whose last field is an absolute path
//! name a backing file.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::PROC_ROOT;
use crate::error::MapsError;

/// Number of whitespace-separated fields in a file-backed maps line.
const MAPS_FIELDS: usize = 6;

/// Returns the backing file path of one maps line, if it names one.
///
/// Anonymous regions (five fields), pseudo-paths such as `[heap]` or
/// `[vdso]`, and lines with extra fields (`(deleted)` suffixes, paths with
/// spaces) yield `None`.
pub fn mapped_path(line: &str) -> Option<&str> {
    let mut fields = line.split_whitespace();
    let path = fields.by_ref().nth(MAPS_FIELDS - 1)?;
    if fields.next().is_some() || !path.starts_with('/') {
        return None;
    }
    Some(path)
}

/// Collects the distinct backing paths from a maps table.
///
/// Lines that are not valid UTF-8 are skipped; I/O errors abort the scan.
pub fn parse_maps<R: BufRead>(reader: R) -> io::Result<BTreeSet<String>> {
    let mut paths = BTreeSet::new();

    for line in reader.split(b'\n') {
        let line = line?;
        let Ok(line) = std::str::from_utf8(&line) else {
            trace!("skipping non UTF-8 maps line");
            continue;
        };
        if let Some(path) = mapped_path(line) {
            if !paths.contains(path) {
                paths.insert(path.to_string());
            }
        }
    }

    Ok(paths)
}

/// Resolves the files mapped by `pid` from `<proc_root>/<pid>/maps`.
pub fn resolve_mapped_files_at(proc_root: &Path, pid: u32) -> Result<BTreeSet<String>, MapsError> {
    let path: PathBuf = proc_root.join(pid.to_string()).join("maps");

    let file = File::open(&path).map_err(|source| MapsError::Open {
        path: path.clone(),
        source,
    })?;

    let paths = parse_maps(BufReader::new(file)).map_err(|source| MapsError::Read {
        path: path.clone(),
        source,
    })?;

    debug!("{}: {} distinct mapped files", path.display(), paths.len());
    Ok(paths)
}

/// Resolves the files mapped by `pid` from `/proc/<pid>/maps`.
///
/// The set is deduplicated and sorted; callers get a stable order.
pub fn resolve_mapped_files(pid: u32) -> Result<BTreeSet<String>, MapsError> {
    resolve_mapped_files_at(Path::new(PROC_ROOT), pid)
}

//! Integration tests for the residency probe.
//!
//! These tests exercise `probe` against real scratch files and the
//! `ResidencyBackend` seam with a scripted backend.

use chrono::Utc;
use pcstat::probe::page_count;
use pcstat::{probe, Probe, ProbeError, ResidencyBackend, Snapshot, PAGE_SIZE};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Backend that reports every page as evicted.
struct EvictedBackend;

impl ResidencyBackend for EvictedBackend {
    fn snapshot(&self, _file: &File, len: u64) -> Result<Snapshot, ProbeError> {
        Ok(Snapshot {
            residency: vec![false; page_count(len, *PAGE_SIZE)],
            captured_at: Utc::now(),
        })
    }
}

/// Backend whose query always fails.
struct FailingBackend;

impl ResidencyBackend for FailingBackend {
    fn snapshot(&self, _file: &File, _len: u64) -> Result<Snapshot, ProbeError> {
        Err(ProbeError::Residency(std::io::Error::from_raw_os_error(
            libc::ENOMEM,
        )))
    }
}

fn write_and_read(path: &Path, len: usize) {
    fs::write(path, vec![0xA5u8; len]).unwrap();
    let mut buf = Vec::new();
    File::open(path).unwrap().read_to_end(&mut buf).unwrap();
    assert_eq!(buf.len(), len);
}

#[test]
fn test_zero_byte_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    fs::write(&path, b"").unwrap();

    let report = probe(&path).unwrap();
    assert_eq!(report.size_bytes(), 0);
    assert_eq!(report.page_count(), 0);
    assert!(report.residency().is_empty());
    assert_eq!(report.cached(), 0);
    assert_eq!(report.uncached(), 0);
    assert_eq!(report.percent(), 0.0);
}

#[test]
fn test_freshly_read_file_is_fully_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hot");
    let len = 3 * *PAGE_SIZE + 1;
    write_and_read(&path, len);

    let report = probe(&path).unwrap();
    assert_eq!(report.size_bytes(), len as u64);
    assert_eq!(report.page_count(), 4);
    assert_eq!(report.residency().len(), 4);
    assert!(report.residency().iter().all(|&r| r));
    assert_eq!(report.cached(), 4);
    assert_eq!(report.uncached(), 0);
    assert_eq!(report.percent(), 100.0);
}

#[test]
fn test_report_invariants() {
    let dir = tempfile::tempdir().unwrap();
    for (i, len) in [1usize, 4095, 4096, 4097, 65_537].into_iter().enumerate() {
        let path = dir.path().join(format!("f{}", i));
        write_and_read(&path, len);

        let report = probe(&path).unwrap();
        assert_eq!(report.page_count(), page_count(len as u64, *PAGE_SIZE));
        assert_eq!(report.cached() + report.uncached(), report.page_count());
        assert!(report.cached() <= report.page_count());
        assert!(report.percent() >= 0.0 && report.percent() <= 100.0);
    }
}

#[test]
fn test_name_is_path_as_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("named.bin");
    fs::write(&path, b"abc").unwrap();

    let report = probe(&path).unwrap();
    assert_eq!(report.name(), path.to_string_lossy());
    assert_eq!(report.narrowed_to_basename().name(), "named.bin");
}

#[test]
fn test_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ts");
    fs::write(&path, b"abc").unwrap();
    let mtime = fs::metadata(&path).unwrap().modified().unwrap();

    let before = Utc::now();
    let report = probe(&path).unwrap();
    let after = Utc::now();

    assert!(report.captured_at() >= before && report.captured_at() <= after);
    assert_eq!(report.modified_at(), chrono::DateTime::<Utc>::from(mtime));
}

// -------------------------------------------------------------------------
// Per-file failures
// -------------------------------------------------------------------------

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, ProbeError::NotFound { .. }));
}

#[test]
fn test_directory_is_invalid_target() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe(dir.path()).unwrap_err();
    assert!(matches!(err, ProbeError::InvalidTarget { .. }));
    assert_eq!(err.to_string(), "file is a directory");
}

// -------------------------------------------------------------------------
// Backend seam
// -------------------------------------------------------------------------

#[test]
fn test_evicted_backend_reports_zero_percent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cold");
    fs::write(&path, vec![0u8; 2 * *PAGE_SIZE]).unwrap();

    let report = Probe::with_backend(EvictedBackend).probe(&path).unwrap();
    assert_eq!(report.page_count(), 2);
    assert!(report.residency().iter().all(|&r| !r));
    assert_eq!(report.cached(), 0);
    assert_eq!(report.uncached(), 2);
    assert_eq!(report.percent(), 0.0);
}

#[test]
fn test_backend_not_called_for_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    fs::write(&path, b"").unwrap();

    // A failing backend is never reached for zero-length files
    let report = Probe::with_backend(FailingBackend).probe(&path).unwrap();
    assert_eq!(report.page_count(), 0);
}

#[test]
fn test_backend_error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data");
    fs::write(&path, b"payload").unwrap();

    let err = Probe::with_backend(FailingBackend).probe(&path).unwrap_err();
    assert!(matches!(err, ProbeError::Residency(_)));
}

//! pcstat - page cache residency statistics
//!
//! This library reports which pages of a file currently sit in the kernel
//! page cache, without changing cache state. It also resolves the files a
//! running process has mapped and can enter that process's mount namespace
//! so those paths resolve.
//!
//! # Features
//!
//! - **Residency probe**: `mmap` + `mincore` per file, mapping released on every path
//! - **Process maps**: deduplicated backing files from `/proc/<pid>/maps`
//! - **Namespace bridge**: `setns(CLONE_NEWNS)` into a target's mount namespace
//! - **Statistics**: cached/uncached counts, percentages, stable sorting, histogram buckets
//! - **Renderers**: ascii/unicode tables, plain columns, terse CSV, JSON, histogram
//!
//! # Usage
//!
//! ```rust,no_run
//! use pcstat::{probe, render, sort_by_cached_desc, RenderOptions};
//!
//! let mut reports = Vec::new();
//! for path in ["/etc/hosts", "/etc/passwd"] {
//!     match probe(path) {
//!         Ok(report) => reports.push(report),
//!         Err(e) => eprintln!("skipping {path:?}: {e}"),
//!     }
//! }
//! sort_by_cached_desc(&mut reports);
//!
//! let stdout = std::io::stdout();
//! render(&mut stdout.lock(), &reports, &RenderOptions::default()).unwrap();
//! ```

pub mod error;
pub mod format;
pub mod probe;
pub mod process;
pub mod report;
pub mod stats;
pub mod terminal;

// Re-export main types for convenience
pub use error::{MapsError, NamespaceError, ProbeError};
pub use format::{render, OutputFormat, RenderOptions};
pub use probe::{probe, MincoreBackend, Probe, ResidencyBackend, Snapshot, PAGE_SIZE};
pub use process::{bridge_into, resolve_mapped_files, Bridge, NamespaceId};
pub use report::ResidencyReport;
pub use stats::{aggregate, histogram_buckets, max_name_len, sort_by_cached_desc, Aggregate};

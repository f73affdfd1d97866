//! Process-related modules for resolving the files a process has mapped.
//!
//! This module provides:
//! - `maps`: backing file paths from /proc/<pid>/maps
//! - `namespace`: mount namespace comparison and switching via /proc/<pid>/ns/mnt

pub mod maps;
pub mod namespace;

/// Root of the proc filesystem.
pub const PROC_ROOT: &str = "/proc";

// Re-export commonly used types
pub use maps::{mapped_path, parse_maps, resolve_mapped_files, resolve_mapped_files_at};
pub use namespace::{bridge_into, mount_namespace, parse_mount_ns_link, Bridge, NamespaceId};

//! Error types for the residency probe, the map-table resolver and the
//! namespace bridge.
//!
//! Probe errors are per-file and skippable by the caller. Map-table and
//! namespace errors abort the whole invocation at the top level.

use std::io;
use std::path::PathBuf;

/// Failure to probe a single file.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("could not open file for read: no such file or directory")]
    NotFound { path: PathBuf },

    #[error("could not open file for read: permission denied")]
    PermissionDenied { path: PathBuf },

    #[error("{reason}")]
    InvalidTarget { path: PathBuf, reason: &'static str },

    #[error("could not open or stat the file: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file is too large to map in one region ({0} bytes)")]
    TooLarge(u64),

    #[error("mmap failed: {0}")]
    Map(#[source] io::Error),

    #[error("mincore failed: {0}")]
    Residency(#[source] io::Error),
}

impl ProbeError {
    /// Classifies an open/stat failure by its `io::ErrorKind`.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => ProbeError::NotFound { path },
            io::ErrorKind::PermissionDenied => ProbeError::PermissionDenied { path },
            _ => ProbeError::Io { path, source: err },
        }
    }
}

/// Failure to read a process memory-map table.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    #[error("could not open '{path}' for read: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading '{path}' failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while comparing or switching mount namespaces.
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("mount namespace link '{link}' does not carry a numeric id")]
    MalformedId { link: String },

    #[error("could not open namespace file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("setns(CLONE_NEWNS) into '{path}' failed: {source}")]
    Switch {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
}

impl NamespaceError {
    /// True when the failure came from missing privilege (EPERM/EACCES),
    /// as opposed to malformed kernel data.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            NamespaceError::Switch { source, .. } => {
                matches!(source, nix::errno::Errno::EPERM | nix::errno::Errno::EACCES)
            }
            NamespaceError::Open { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            NamespaceError::MalformedId { .. } => false,
        }
    }
}

//! Mount namespace bridging.
//!
//! Paths listed in a containerized process's maps table are only meaningful
//! inside that process's mount namespace. `bridge_into` moves the calling
//! process into the target's mount namespace when the two differ, so those
//! paths can be opened directly.
//!
//! `setns(CLONE_NEWNS)` is refused for multi-threaded callers, so the bridge
//! must run before any worker thread is spawned. There is no way back: the
//! process stays in the target namespace until it exits.

use nix::sched::{setns, CloneFlags};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::PROC_ROOT;
use crate::error::NamespaceError;

/// Identifier of a mount namespace (the inode number behind `ns/mnt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub u64);

impl NamespaceId {
    /// Sentinel for "no namespace information available".
    pub const UNKNOWN: NamespaceId = NamespaceId(0);

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mnt:[{}]", self.0)
    }
}

/// Outcome of `bridge_into`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bridge {
    /// Caller and target already share a mount namespace.
    SameNamespace(NamespaceId),
    /// The caller now lives in the target's mount namespace.
    Switched { from: NamespaceId, to: NamespaceId },
}

/// Parses a namespace link target of the form `mnt:[4026531840]`.
///
/// The prefix and suffix are optional; whatever remains must be a decimal
/// number.
pub fn parse_mount_ns_link(link: &str) -> Result<NamespaceId, NamespaceError> {
    let id = link.strip_prefix("mnt:[").unwrap_or(link);
    let id = id.strip_suffix(']').unwrap_or(id);
    id.parse::<u64>()
        .map(NamespaceId)
        .map_err(|_| NamespaceError::MalformedId {
            link: link.to_string(),
        })
}

fn ns_link_path(proc_root: &Path, pid: u32) -> PathBuf {
    proc_root.join(pid.to_string()).join("ns").join("mnt")
}

/// Reads the mount namespace id of `pid` under `proc_root`.
///
/// A missing or unreadable link (no namespace support, process gone) yields
/// `NamespaceId::UNKNOWN`; only a link with a non-numeric id is an error.
pub fn mount_namespace_at(proc_root: &Path, pid: u32) -> Result<NamespaceId, NamespaceError> {
    let path = ns_link_path(proc_root, pid);
    let link = match fs::read_link(&path) {
        Ok(link) => link,
        Err(e) => {
            debug!("could not read {}: {} - assuming unknown namespace", path.display(), e);
            return Ok(NamespaceId::UNKNOWN);
        }
    };

    let link = link.to_string_lossy();
    if link.is_empty() {
        return Ok(NamespaceId::UNKNOWN);
    }
    parse_mount_ns_link(&link)
}

/// Reads the mount namespace id of `pid` from `/proc/<pid>/ns/mnt`.
pub fn mount_namespace(pid: u32) -> Result<NamespaceId, NamespaceError> {
    mount_namespace_at(Path::new(PROC_ROOT), pid)
}

/// Switches the calling process into the mount namespace of `pid` if it
/// differs from its own.
///
/// Requires CAP_SYS_ADMIN and CAP_SYS_CHROOT; without them the error reports
/// `is_permission_denied()` and the caller decides whether to continue.
pub fn bridge_into(pid: u32) -> Result<Bridge, NamespaceError> {
    let own = mount_namespace(std::process::id())?;
    let target = mount_namespace(pid)?;

    if own == target {
        debug!("pid {} shares our mount namespace {}", pid, own);
        return Ok(Bridge::SameNamespace(own));
    }

    let path = ns_link_path(Path::new(PROC_ROOT), pid);
    let ns = File::open(&path).map_err(|source| NamespaceError::Open {
        path: path.clone(),
        source,
    })?;

    setns(&ns, CloneFlags::CLONE_NEWNS).map_err(|source| NamespaceError::Switch {
        path: path.clone(),
        source,
    })?;

    info!("switched mount namespace {} -> {} (pid {})", own, target, pid);
    Ok(Bridge::Switched {
        from: own,
        to: target,
    })
}

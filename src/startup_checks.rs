//! Runtime requirement validation for pcstat.
//!
//! Checks that the residency query works on this kernel, that /proc is
//! readable, and whether the process holds the privileges needed to enter
//! another process's mount namespace.

use nix::unistd::geteuid;
use pcstat::process::{mount_namespace, resolve_mapped_files};
use pcstat::{probe, PAGE_SIZE};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements, optionally against a target pid
pub fn validate_requirements(pid: Option<u32>) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_residency_query()?;
    check_proc_access()?;
    let privileged = check_user_privileges();

    if let Some(pid) = pid {
        check_target(pid, privileged)?;
    }

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Probe our own executable; it is mapped, so at least part of it is cached.
fn check_residency_query() -> Result<(), ValidationError> {
    debug!("Page size: {} bytes", *PAGE_SIZE);

    let exe = std::env::current_exe()
        .map_err(|e| ValidationError::ResidencyQuery(format!("cannot locate executable: {}", e)))?;

    match probe(&exe) {
        Ok(report) => {
            info!(
                "✅ mincore available: {} has {}/{} pages cached",
                exe.display(),
                report.cached(),
                report.page_count()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Residency query failed on {}: {}", exe.display(), e);
            Err(ValidationError::ResidencyQuery(e.to_string()))
        }
    }
}

/// Check that /proc is mounted and our own maps table is readable
fn check_proc_access() -> Result<(), ValidationError> {
    if !Path::new("/proc/self/maps").exists() {
        error!("❌ /proc/self/maps not found - is /proc mounted?");
        return Err(ValidationError::ProcUnavailable);
    }

    match resolve_mapped_files(std::process::id()) {
        Ok(files) => {
            info!("✅ /proc access: {} files mapped by this process", files.len());
            Ok(())
        }
        Err(e) => {
            error!("❌ Cannot read own maps table: {}", e);
            Err(ValidationError::ProcUnavailable)
        }
    }
}

/// Entering another mount namespace needs CAP_SYS_ADMIN; not fatal here
fn check_user_privileges() -> bool {
    if geteuid().is_root() {
        info!("✅ Running as root (uid=0)");
        true
    } else {
        warn!("⚠️  Not running as root - --pid cannot enter other mount namespaces");
        warn!("   Files of containerized processes may not resolve from here");
        false
    }
}

/// Check the target's maps table and mount namespace link
fn check_target(pid: u32, privileged: bool) -> Result<(), ValidationError> {
    let files = resolve_mapped_files(pid).map_err(|e| {
        error!("❌ Cannot read maps of pid {}: {}", pid, e);
        ValidationError::TargetUnreadable(e.to_string())
    })?;
    info!("✅ pid {} maps {} distinct files", pid, files.len());

    let own = mount_namespace(std::process::id())
        .map_err(|e| ValidationError::TargetUnreadable(e.to_string()))?;
    let target =
        mount_namespace(pid).map_err(|e| ValidationError::TargetUnreadable(e.to_string()))?;

    if own == target {
        info!("✅ pid {} shares our mount namespace {}", pid, own);
    } else if privileged {
        info!("✅ pid {} lives in mount namespace {} (ours: {}), switch possible", pid, target, own);
    } else {
        warn!(
            "⚠️  pid {} lives in mount namespace {} (ours: {}) and we lack privilege to enter it",
            pid, target, own
        );
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Residency query unavailable: {0}")]
    ResidencyQuery(String),

    #[error("/proc filesystem not available")]
    ProcUnavailable,

    #[error("Target process not accessible: {0}")]
    TargetUnreadable(String),
}

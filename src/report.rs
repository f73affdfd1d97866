//! Per-file residency report.
//!
//! A `ResidencyReport` is built once by the probe and never mutated afterwards,
//! with two exceptions the caller opts into explicitly: renaming (basename
//! narrowing) and stripping the per-page bitmap before serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::stats::aggregate;

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_zero_usize(v: &usize) -> bool {
    *v == 0
}

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

/// Page cache status of one file at capture time.
///
/// JSON field names follow the established `pcstat` output format:
/// `name, size, timestamp, mtime, pages, cached, uncached, percent, pp_stat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidencyReport {
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,

    #[serde(rename = "size", skip_serializing_if = "is_zero_u64")]
    size_bytes: u64,

    #[serde(rename = "timestamp")]
    captured_at: DateTime<Utc>,

    #[serde(rename = "mtime")]
    modified_at: DateTime<Utc>,

    #[serde(rename = "pages", skip_serializing_if = "is_zero_usize")]
    page_count: usize,

    #[serde(skip_serializing_if = "is_zero_usize")]
    cached: usize,

    #[serde(skip_serializing_if = "is_zero_usize")]
    uncached: usize,

    #[serde(skip_serializing_if = "is_zero_f64")]
    percent: f64,

    #[serde(rename = "pp_stat")]
    residency: Vec<bool>,
}

impl ResidencyReport {
    /// Builds a report from a residency bitmap; counts and percentage are
    /// derived here and nowhere else.
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
        captured_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
        residency: Vec<bool>,
    ) -> Self {
        let stats = aggregate(&residency);
        Self {
            name: name.into(),
            size_bytes,
            captured_at,
            modified_at,
            page_count: residency.len(),
            cached: stats.cached,
            uncached: stats.uncached,
            percent: stats.percent,
            residency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn cached(&self) -> usize {
        self.cached
    }

    pub fn uncached(&self) -> usize {
        self.uncached
    }

    /// Percentage of cached pages; `0.0` for empty files.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// One entry per page, true when resident at capture time.
    /// Empty after `strip_residency`.
    pub fn residency(&self) -> &[bool] {
        &self.residency
    }

    /// Replaces the display name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Narrows the name to its final path component (`--bname`).
    /// Names without a final component (e.g. `/`) are left alone.
    pub fn narrowed_to_basename(self) -> Self {
        let base = Path::new(&self.name)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned());
        match base {
            Some(base) => self.renamed(base),
            None => self,
        }
    }

    /// Drops the per-page bitmap to bound serialized output size.
    /// Scalar fields keep their values.
    pub fn strip_residency(&mut self) {
        self.residency = Vec::new();
    }
}

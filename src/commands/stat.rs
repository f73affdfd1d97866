//! Stat command implementation.
//!
//! Enters the target's mount namespace (when --pid is given), collects the
//! file list, probes every file and renders the reports to stdout.

use anyhow::{bail, Context, Result};
use pcstat::format::DEFAULT_COLUMNS;
use pcstat::process::{bridge_into, resolve_mapped_files, Bridge};
use pcstat::terminal::window_size;
use pcstat::{probe, render, sort_by_cached_desc, OutputFormat, RenderOptions, ResidencyReport};
use rayon::prelude::*;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Probes `files` plus the files mapped by `pid` and prints the result.
pub fn command_stat(files: Vec<String>, pid: Option<u32>, config: &Config) -> Result<()> {
    let mut files = files;

    if let Some(pid) = pid {
        // Must precede any path resolution and any worker thread
        enter_namespace(pid, config.require_namespace())?;

        let mapped = resolve_mapped_files(pid)
            .with_context(|| format!("could not list files mapped by pid {}", pid))?;
        info!("pid {} maps {} distinct files", pid, mapped.len());
        files.extend(mapped);
    }

    if files.is_empty() {
        bail!("no files to inspect");
    }

    // Geometry failures are fatal, so query before doing any work
    let opts = render_options(config)?;

    let mut reports = probe_all(&files, config.parallelism)?;
    debug!("{} of {} files probed", reports.len(), files.len());

    if config.basename() {
        reports = reports
            .into_iter()
            .map(ResidencyReport::narrowed_to_basename)
            .collect();
    }

    if config.sort() {
        sort_by_cached_desc(&mut reports);
    }

    if opts.format == OutputFormat::Json && !config.per_page_status() {
        reports.iter_mut().for_each(ResidencyReport::strip_residency);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &reports, &opts).context("failed to write report")?;
    out.flush()?;
    Ok(())
}

/// Enters the mount namespace of `pid`.
///
/// Missing privilege is downgraded to a warning unless `required` is set;
/// malformed namespace data is always an error.
fn enter_namespace(pid: u32, required: bool) -> Result<()> {
    match bridge_into(pid) {
        Ok(Bridge::SameNamespace(ns)) => {
            debug!("pid {} shares mount namespace {}", pid, ns);
        }
        Ok(Bridge::Switched { from, to }) => {
            info!("entered mount namespace {} of pid {} (was {})", to, pid, from);
        }
        Err(e) if e.is_permission_denied() && !required => {
            warn!(
                "⚠️  cannot enter mount namespace of pid {}: {} - paths are resolved in our own namespace",
                pid, e
            );
        }
        Err(e) => {
            return Err(e).with_context(|| format!("could not enter mount namespace of pid {}", pid));
        }
    }
    Ok(())
}

fn render_options(config: &Config) -> Result<RenderOptions> {
    let format = config.format();
    let columns = match (format, config.columns) {
        (_, Some(columns)) => columns,
        (OutputFormat::Histogram, None) => {
            let ws = window_size().context("TIOCGWINSZ failed to get terminal size")?;
            usize::from(ws.cols)
        }
        _ => DEFAULT_COLUMNS,
    };

    Ok(RenderOptions {
        format,
        no_header: config.no_header(),
        columns,
    })
}

/// Probes one file; failures are logged and the file is left out.
fn probe_one(name: &str) -> Option<ResidencyReport> {
    match probe(name) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("skipping {:?}: {}", name, e);
            None
        }
    }
}

/// Probes all files, sequentially or on a bounded rayon pool. Output keeps
/// input order either way.
fn probe_all(files: &[String], parallelism: Option<usize>) -> Result<Vec<ResidencyReport>> {
    match parallelism {
        None | Some(1) => Ok(files.iter().filter_map(|f| probe_one(f)).collect()),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("failed to build probe thread pool")?;
            debug!("probing on {} threads", pool.current_num_threads());
            Ok(pool.install(|| files.par_iter().filter_map(|f| probe_one(f)).collect()))
        }
    }
}

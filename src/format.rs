//! Output renderers for residency reports.
//!
//! All renderers write to any `io::Write` and take their toggles from an
//! explicit `RenderOptions` value.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::report::ResidencyReport;
use crate::stats::{histogram_buckets, intensity_level, level_glyph, max_name_len};

/// Width used for histograms when the caller has no terminal geometry.
pub const DEFAULT_COLUMNS: usize = 80;

/// Presentation modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table
    #[default]
    Text,
    /// Table drawn with unicode box characters
    Unicode,
    /// Columns without box characters
    Plain,
    /// Comma separated, one line per file
    Terse,
    /// JSON array
    Json,
    /// One bar chart of page residency per file
    Histogram,
}

/// Presentation toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Omit header lines (text, unicode, plain, terse)
    pub no_header: bool,
    /// Terminal width for the histogram
    pub columns: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            no_header: false,
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// Renders `reports` in the selected format.
pub fn render<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    opts: &RenderOptions,
) -> io::Result<()> {
    match opts.format {
        OutputFormat::Text => render_text(out, reports, opts.no_header),
        OutputFormat::Unicode => render_unicode(out, reports, opts.no_header),
        OutputFormat::Plain => render_plain(out, reports, opts.no_header),
        OutputFormat::Terse => render_terse(out, reports, opts.no_header),
        OutputFormat::Json => render_json(out, reports),
        OutputFormat::Histogram => render_histogram(out, reports, opts.columns),
    }
}

fn pad(name: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(name.chars().count()))
}

/// Box characters for one table style.
struct Grid {
    horizontal: char,
    vertical: char,
    top: [char; 3],
    middle: [char; 3],
    bottom: [char; 3],
}

const ASCII_GRID: Grid = Grid {
    horizontal: '-',
    vertical: '|',
    top: ['+', '+', '+'],
    middle: ['|', '+', '|'],
    bottom: ['+', '+', '+'],
};

const UNICODE_GRID: Grid = Grid {
    horizontal: '─',
    vertical: '│',
    top: ['┌', '┬', '┐'],
    middle: ['├', '┼', '┤'],
    bottom: ['└', '┴', '┘'],
};

/// Widths of the Size, Pages, Cached and Percent cells including padding.
const CELL_WIDTHS: [usize; 4] = [16, 12, 11, 9];

impl Grid {
    fn rule(&self, [left, cross, right]: [char; 3], name_width: usize) -> String {
        let h = self.horizontal.to_string();
        let mut line = String::new();
        line.push(left);
        line.push_str(&h.repeat(name_width + 2));
        for width in CELL_WIDTHS {
            line.push(cross);
            line.push_str(&h.repeat(width));
        }
        line.push(right);
        line
    }
}

fn render_table<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    no_header: bool,
    grid: &Grid,
) -> io::Result<()> {
    let max_name = max_name_len(reports);
    let v = grid.vertical;

    writeln!(out, "{}", grid.rule(grid.top, max_name))?;

    // --nohdr saves two lines of vertical space
    if !no_header {
        writeln!(
            out,
            "{v} Name{} {v} Size (bytes)   {v} Pages      {v} Cached    {v} Percent {v}",
            pad("Name", max_name)
        )?;
        writeln!(out, "{}", grid.rule(grid.middle, max_name))?;
    }

    for r in reports {
        // %07.3f keeps the decimal points aligned when scanning vertically
        writeln!(
            out,
            "{v} {}{} {v} {:<15}{v} {:<11}{v} {:<10}{v} {:07.3} {v}",
            r.name(),
            pad(r.name(), max_name),
            r.size_bytes(),
            r.page_count(),
            r.cached(),
            r.percent()
        )?;
    }

    writeln!(out, "{}", grid.rule(grid.bottom, max_name))
}

/// ASCII table (the default).
pub fn render_text<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    no_header: bool,
) -> io::Result<()> {
    render_table(out, reports, no_header, &ASCII_GRID)
}

/// Table with unicode box-drawing characters.
pub fn render_unicode<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    no_header: bool,
) -> io::Result<()> {
    render_table(out, reports, no_header, &UNICODE_GRID)
}

/// Aligned columns, no grid.
pub fn render_plain<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    no_header: bool,
) -> io::Result<()> {
    let max_name = max_name_len(reports);

    if !no_header {
        writeln!(
            out,
            "Name{}  Size (bytes)    Pages       Cached     Percent",
            pad("Name", max_name)
        )?;
    }

    for r in reports {
        writeln!(
            out,
            "{}{}  {:<15} {:<11} {:<10} {:07.3}",
            r.name(),
            pad(r.name(), max_name),
            r.size_bytes(),
            r.page_count(),
            r.cached(),
            r.percent()
        )?;
    }
    Ok(())
}

/// `name,size,timestamp,mtime,pages,cached,percent` with unix seconds.
pub fn render_terse<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    no_header: bool,
) -> io::Result<()> {
    if !no_header {
        writeln!(out, "name,size,timestamp,mtime,pages,cached,percent")?;
    }
    for r in reports {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            r.name(),
            r.size_bytes(),
            r.captured_at().timestamp(),
            r.modified_at().timestamp(),
            r.page_count(),
            r.cached(),
            r.percent()
        )?;
    }
    Ok(())
}

/// Compact JSON array followed by a newline.
///
/// Per-page status is serialized as-is; callers strip it beforehand when
/// it is not wanted.
pub fn render_json<W: Write>(out: &mut W, reports: &[ResidencyReport]) -> io::Result<()> {
    serde_json::to_writer(&mut *out, reports)?;
    writeln!(out)
}

/// One row per file: name, page count, then one glyph per bucket.
pub fn render_histogram<W: Write>(
    out: &mut W,
    reports: &[ResidencyReport],
    columns: usize,
) -> io::Result<()> {
    let max_name = max_name_len(reports);

    for r in reports {
        let bars: String = histogram_buckets(r, columns, max_name)
            .into_iter()
            .map(|avg| level_glyph(intensity_level(avg)))
            .collect();
        writeln!(
            out,
            "{}{} {:8} {}",
            r.name(),
            pad(r.name(), max_name),
            r.page_count(),
            bars
        )?;
    }
    Ok(())
}

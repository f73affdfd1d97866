//! Aggregation, ordering and histogram bucketing of residency reports.
//!
//! Everything here is pure: no I/O, no terminal access. Renderers pass in the
//! geometry they queried.

use crate::report::ResidencyReport;

/// Minimum width of the name column, keeps the "Name" header legible.
pub const MIN_NAME_WIDTH: usize = 5;

/// Columns reserved beside the glyphs in a histogram row.
const HISTOGRAM_RESERVED_GLYPHS: usize = 10;

/// Block elements render about twice as wide as ASCII characters.
const COLUMNS_PER_GLYPH: usize = 2;

/// Counts derived from a residency bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub cached: usize,
    pub uncached: usize,
    pub percent: f64,
}

/// Counts cached pages and computes the cached percentage.
///
/// An empty bitmap has a defined percentage of `0.0` instead of NaN.
pub fn aggregate(residency: &[bool]) -> Aggregate {
    let pages = residency.len();
    let cached = residency.iter().filter(|&&resident| resident).count();
    let percent = if pages == 0 {
        0.0
    } else {
        (cached as f64 / pages as f64) * 100.0
    };

    Aggregate {
        cached,
        uncached: pages - cached,
        percent,
    }
}

/// Sorts by cached page count, highest first. Stable: equal counts keep
/// their input order.
pub fn sort_by_cached_desc(reports: &mut [ResidencyReport]) {
    reports.sort_by(|a, b| b.cached().cmp(&a.cached()));
}

/// Width of the name column: longest name in characters, at least
/// `MIN_NAME_WIDTH`.
pub fn max_name_len(reports: &[ResidencyReport]) -> usize {
    reports
        .iter()
        .map(|r| r.name().chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH)
}

/// Number of glyphs a histogram row can hold for the given terminal width.
/// Never less than one.
pub fn glyph_budget(columns: usize, max_name: usize) -> usize {
    (columns.saturating_sub(max_name) / COLUMNS_PER_GLYPH)
        .saturating_sub(HISTOGRAM_RESERVED_GLYPHS)
        .max(1)
}

/// Average residency per histogram bucket, each in `[0, 1]`.
///
/// When every page fits in the glyph budget, one value per page is returned.
/// Otherwise pages are grouped via `bucket_averages`.
pub fn histogram_buckets(report: &ResidencyReport, columns: usize, max_name: usize) -> Vec<f64> {
    let budget = glyph_budget(columns, max_name);
    let residency = report.residency();

    if budget > residency.len() {
        residency
            .iter()
            .map(|&resident| if resident { 1.0 } else { 0.0 })
            .collect()
    } else {
        bucket_averages(residency, budget)
    }
}

/// Groups the bitmap into contiguous runs of `len / bucket_count` pages and
/// averages each run.
///
/// When the length is not a multiple of the bucket count the leftover pages
/// form one trailing, shorter bucket averaged over its own length, so no page
/// is dropped from the display.
pub fn bucket_averages(residency: &[bool], bucket_count: usize) -> Vec<f64> {
    if bucket_count == 0 || residency.is_empty() {
        return Vec::new();
    }

    let bucket_size = (residency.len() / bucket_count).max(1);
    residency
        .chunks(bucket_size)
        .map(|run| {
            let cached = run.iter().filter(|&&resident| resident).count();
            cached as f64 / run.len() as f64
        })
        .collect()
}

/// Upper bounds for levels 2..=7, compared with strict `<` in order.
const LEVEL_THRESHOLDS: [f64; 6] = [
    1.0 / 6.0,
    2.0 / 6.0,
    3.0 / 6.0,
    4.0 / 6.0,
    5.0 / 6.0,
    1.0,
];

/// Maps an average residency to a bar height in eighths (1..=8).
///
/// Zero is the lowest bar (1/8), a full bucket is 8/8; anything between is
/// the first threshold it falls strictly below.
pub fn intensity_level(avg: f64) -> u8 {
    if avg <= 0.0 {
        return 1;
    }
    LEVEL_THRESHOLDS
        .iter()
        .position(|&limit| avg < limit)
        .map(|idx| idx as u8 + 2)
        .unwrap_or(8)
}

/// Lower block element for a level from `intensity_level`
/// (U+2581 ▁ through U+2588 █).
pub fn level_glyph(level: u8) -> char {
    const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    GLYPHS[usize::from(level.clamp(1, 8)) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(name: &str, residency: Vec<bool>) -> ResidencyReport {
        let now = Utc::now();
        ResidencyReport::new(name, residency.len() as u64 * 4096, now, now, residency)
    }

    // -------------------------------------------------------------------------
    // Tests for aggregate
    // -------------------------------------------------------------------------

    #[test]
    fn test_aggregate_counts() {
        let agg = aggregate(&[true, false, true, false]);
        assert_eq!(agg.cached, 2);
        assert_eq!(agg.uncached, 2);
        assert_eq!(agg.percent, 50.0);
    }

    #[test]
    fn test_aggregate_empty_is_zero_not_nan() {
        let agg = aggregate(&[]);
        assert_eq!(agg.cached, 0);
        assert_eq!(agg.uncached, 0);
        assert_eq!(agg.percent, 0.0);
    }

    #[test]
    fn test_aggregate_extremes() {
        assert_eq!(aggregate(&[false; 7]).percent, 0.0);
        assert_eq!(aggregate(&[true; 7]).percent, 100.0);
    }

    // -------------------------------------------------------------------------
    // Tests for sort_by_cached_desc
    // -------------------------------------------------------------------------

    #[test]
    fn test_sort_is_stable_descending() {
        let mut reports = vec![
            report("a", vec![true, true, true, false]),
            report("b", vec![true, true, true, true, true]),
            report("c", vec![true, true, true]),
        ];
        sort_by_cached_desc(&mut reports);

        let order: Vec<(&str, usize)> = reports.iter().map(|r| (r.name(), r.cached())).collect();
        assert_eq!(order, vec![("b", 5), ("a", 3), ("c", 3)]);
    }

    // -------------------------------------------------------------------------
    // Tests for max_name_len
    // -------------------------------------------------------------------------

    #[test]
    fn test_max_name_len_floor() {
        assert_eq!(max_name_len(&[]), MIN_NAME_WIDTH);
        assert_eq!(max_name_len(&[report("ab", vec![])]), MIN_NAME_WIDTH);
        assert_eq!(
            max_name_len(&[report("ab", vec![]), report("/usr/lib/libc.so.6", vec![])]),
            18
        );
    }

    // -------------------------------------------------------------------------
    // Tests for histogram bucketing
    // -------------------------------------------------------------------------

    #[test]
    fn test_bucket_averages_even_split() {
        let t = true;
        let f = false;
        let bitmap = [t, t, f, f, t, f, f, f, t, t, t, t];
        let avgs = bucket_averages(&bitmap, 3);
        assert_eq!(avgs, vec![0.5, 0.25, 1.0]);

        let levels: Vec<u8> = avgs.iter().map(|&a| intensity_level(a)).collect();
        // 0.5 sits exactly on the 3/6 bound, strict `<` puts it in the 4/6 band
        assert_eq!(levels, vec![5, 3, 8]);
    }

    #[test]
    fn test_bucket_averages_keeps_trailing_partial_run() {
        let bitmap = [true, true, true, false, false, false, false, false, false, true];
        let avgs = bucket_averages(&bitmap, 3);
        assert_eq!(avgs.len(), 4);
        assert_eq!(avgs[0], 1.0);
        assert_eq!(avgs[1], 0.0);
        assert_eq!(avgs[2], 0.0);
        assert_eq!(avgs[3], 1.0);
    }

    #[test]
    fn test_bucket_averages_degenerate() {
        assert!(bucket_averages(&[], 4).is_empty());
        assert!(bucket_averages(&[true], 0).is_empty());
    }

    #[test]
    fn test_glyph_budget() {
        // (120 - 20) / 2 - 10
        assert_eq!(glyph_budget(120, 20), 40);
        // Narrow terminals still get one glyph
        assert_eq!(glyph_budget(20, 30), 1);
        assert_eq!(glyph_budget(0, 5), 1);
    }

    #[test]
    fn test_histogram_per_page_when_room() {
        let r = report("f", vec![true, false, true]);
        assert_eq!(histogram_buckets(&r, 120, 5), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_histogram_groups_when_narrow() {
        // budget = (35 - 5) / 2 - 10 = 5 glyphs for 20 pages -> 4 pages per bucket
        let mut bitmap = vec![false; 20];
        bitmap[..4].iter_mut().for_each(|p| *p = true);
        let r = report("f", bitmap);
        let buckets = histogram_buckets(&r, 35, 5);
        assert_eq!(buckets, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    // -------------------------------------------------------------------------
    // Tests for intensity levels
    // -------------------------------------------------------------------------

    #[test]
    fn test_intensity_levels() {
        assert_eq!(intensity_level(0.0), 1);
        assert_eq!(intensity_level(0.1), 2);
        assert_eq!(intensity_level(0.25), 3);
        assert_eq!(intensity_level(0.4), 4);
        assert_eq!(intensity_level(0.6), 5);
        assert_eq!(intensity_level(0.7), 6);
        assert_eq!(intensity_level(0.9), 7);
        assert_eq!(intensity_level(1.0), 8);
    }

    #[test]
    fn test_level_glyphs() {
        assert_eq!(level_glyph(1), '▁');
        assert_eq!(level_glyph(4), '▄');
        assert_eq!(level_glyph(8), '█');
        assert_eq!(level_glyph(0), '▁');
        assert_eq!(level_glyph(9), '█');
    }
}

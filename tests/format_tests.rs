//! Integration tests for the renderers.
//!
//! These tests render hand-built reports into memory buffers.

use chrono::{TimeZone, Utc};
use pcstat::{render, OutputFormat, RenderOptions, ResidencyReport};

fn reports() -> Vec<ResidencyReport> {
    let ts = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
    vec![
        ResidencyReport::new("/srv/data/big.idx", 8 * 4096, ts, ts, vec![true; 8]),
        ResidencyReport::new("/srv/data/cold.log", 3 * 4096, ts, ts, vec![false; 3]),
    ]
}

fn render_to_string(reports: &[ResidencyReport], opts: RenderOptions) -> String {
    let mut buf = Vec::new();
    render(&mut buf, reports, &opts).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_json_stripped_round_trip() {
    let mut stripped = reports();
    stripped.iter_mut().for_each(ResidencyReport::strip_residency);

    let out = render_to_string(
        &stripped,
        RenderOptions {
            format: OutputFormat::Json,
            ..Default::default()
        },
    );
    let back: Vec<ResidencyReport> = serde_json::from_str(out.trim_end()).unwrap();

    assert_eq!(back.len(), 2);
    for (orig, parsed) in reports().iter().zip(&back) {
        assert!(parsed.residency().is_empty());
        assert_eq!(parsed.name(), orig.name());
        assert_eq!(parsed.size_bytes(), orig.size_bytes());
        assert_eq!(parsed.page_count(), orig.page_count());
        assert_eq!(parsed.cached(), orig.cached());
        assert_eq!(parsed.uncached(), orig.uncached());
        assert_eq!(parsed.percent(), orig.percent());
        assert_eq!(parsed.captured_at(), orig.captured_at());
        assert_eq!(parsed.modified_at(), orig.modified_at());
    }
}

#[test]
fn test_json_with_per_page_status() {
    let out = render_to_string(
        &reports(),
        RenderOptions {
            format: OutputFormat::Json,
            ..Default::default()
        },
    );
    let back: Vec<ResidencyReport> = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(back[0].residency(), &[true; 8]);
    assert_eq!(back[1].residency(), &[false; 3]);
}

#[test]
fn test_terse_no_header() {
    let out = render_to_string(
        &reports(),
        RenderOptions {
            format: OutputFormat::Terse,
            no_header: true,
            ..Default::default()
        },
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "/srv/data/big.idx,32768,1672628645,1672628645,8,8,100");
    assert_eq!(lines[1], "/srv/data/cold.log,12288,1672628645,1672628645,3,0,0");
}

#[test]
fn test_histogram_rows() {
    let out = render_to_string(
        &reports(),
        RenderOptions {
            format: OutputFormat::Histogram,
            columns: 100,
            ..Default::default()
        },
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(&"█".repeat(8)));
    assert!(lines[1].ends_with(&"▁".repeat(3)));
}

#[test]
fn test_empty_batch_tables() {
    let out = render_to_string(&[], RenderOptions::default());
    // top, header, rule, bottom
    assert_eq!(out.lines().count(), 4);
    assert!(out.contains("| Name  |"));
}

//! Rendering of run statistics.

use crate::error::Result;
use crate::pipeline::StatisticsReport;
use serde::Serialize;
use std::fmt::Write;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any report value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Human-readable summary of a run, one `label: value` per line.
pub fn to_text(report: &StatisticsReport) -> String {
    let stats = &report.statistics;
    let mut rows: Vec<(String, String)> = vec![
        ("Paragraphs".into(), stats.total_paragraphs.to_string()),
        ("Skipped".into(), stats.skipped_paragraphs.to_string()),
        ("H1 headings".into(), stats.h1_formatted.to_string()),
        ("H2 headings".into(), stats.h2_formatted.to_string()),
        ("H3 headings".into(), stats.h3_formatted.to_string()),
        ("H4 headings".into(), stats.h4_formatted.to_string()),
        ("Lists".into(), stats.lists_formatted.to_string()),
        ("Regular".into(), stats.regular_formatted.to_string()),
        (
            "Tables".into(),
            format!("{}/{}", stats.tables_formatted, stats.total_tables),
        ),
        ("Errors".into(), stats.errors.to_string()),
        ("Main content".into(), yes_no(report.main_content_found)),
        ("Contents".into(), yes_no(report.contents_section_detected)),
        ("References".into(), yes_no(report.references_section_detected)),
        ("Strategy".into(), report.strategy.to_string()),
        ("Duration".into(), format!("{} ms", report.duration_ms)),
    ];
    for (role, count) in &stats.roles {
        rows.push((format!("  {}", role), count.to_string()));
    }

    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "{}:{} {}", label, " ".repeat(pad), value);
    }
    out
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

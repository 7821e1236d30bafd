//! Markdown rendering of the report payload.

use std::fmt::Write as _;

use crate::payload::ReportPayload;

/// Renders the full report document.
///
/// Layout mirrors the summary → distribution → top issues → detail-table
/// flow of the downloadable report.
#[must_use]
pub fn render_markdown(payload: &ReportPayload) -> String {
    let mut out = String::new();

    out.push_str("# Customer Feedback Analysis Report\n\n");
    let _ = writeln!(
        out,
        "Generated: {}\n",
        payload.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    if payload.cancelled {
        out.push_str("> Partial report: the batch was cancelled before completing.\n\n");
    }

    let _ = writeln!(out, "Total reviews analyzed: {}\n", payload.total);
    let _ = writeln!(out, "- Positive: {}", payload.counts.positive);
    let _ = writeln!(out, "- Neutral: {}", payload.counts.neutral);
    let _ = writeln!(out, "- Negative: {}\n", payload.counts.negative);

    out.push_str("## Sentiment distribution\n\n");
    out.push_str("| Sentiment | Count |\n|---|---|\n");
    for slice in &payload.chart_data {
        let _ = writeln!(out, "| {} | {} |", slice.label, slice.count);
    }
    out.push('\n');

    if !payload.top_issues.is_empty() {
        out.push_str("## Top issues\n\n");
        out.push_str("| Issue | Count |\n|---|---|\n");
        for slice in &payload.top_issues {
            let _ = writeln!(out, "| {} | {} |", slice.label, slice.count);
        }
        out.push('\n');
    }

    out.push_str("## Review detail\n\n");
    out.push_str("| Review | Sentiment | Issues |\n|---|---|---|\n");
    for row in &payload.rows {
        let issues = if row.issues.is_empty() {
            "None".to_owned()
        } else {
            row.issues.join(", ")
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(&row.excerpt),
            row.sentiment,
            issues
        );
    }

    if payload.failures.total > 0 {
        out.push('\n');
        let _ = writeln!(out, "## Failures ({})\n", payload.failures.total);
        for sample in &payload.failures.samples {
            let _ = writeln!(out, "- {}", escape_cell(sample));
        }
    }

    out
}

/// Keeps free text from breaking the table: pipes are escaped and
/// newlines collapsed to spaces.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

//! Structured report payload derived from a batch result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cfa_core::{BatchResult, SentimentCounts, SentimentLabel};

/// Review excerpts are capped at this many characters in report rows.
const EXCERPT_MAX_CHARS: usize = 100;

/// How many failure reasons are quoted verbatim in the summary.
const FAILURE_SAMPLE_LIMIT: usize = 5;

/// Everything a report renderer needs, fully determined by the batch.
#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub generated_at: DateTime<Utc>,
    /// Number of successfully analyzed reviews.
    pub total: usize,
    pub counts: SentimentCounts,
    pub rows: Vec<ReportRow>,
    /// Sentiment distribution as renderable label→count pairs, in fixed
    /// positive/neutral/negative order.
    pub chart_data: Vec<ChartSlice>,
    /// Issue categories ranked by frequency, most common first.
    pub top_issues: Vec<ChartSlice>,
    pub failures: FailureSummary,
    pub cancelled: bool,
}

/// One review line in the report detail table.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub excerpt: String,
    pub sentiment: SentimentLabel,
    pub issues: Vec<String>,
}

/// A single label→count pair for chart rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub count: u64,
}

/// Failure roll-up: total count plus a handful of sample reasons.
#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub total: usize,
    pub samples: Vec<String>,
}

/// Builds the report payload from a frozen batch result.
#[must_use]
pub fn assemble(batch: &BatchResult) -> ReportPayload {
    let rows = batch
        .results
        .iter()
        .map(|result| ReportRow {
            excerpt: excerpt(&result.review.text),
            sentiment: result.sentiment,
            issues: result.issues.iter().map(ToString::to_string).collect(),
        })
        .collect();

    let chart_data = SentimentLabel::all()
        .into_iter()
        .map(|label| ChartSlice {
            label: label.as_str().to_owned(),
            count: batch.sentiment_counts.get(label),
        })
        .collect();

    let top_issues = batch
        .top_issues()
        .into_iter()
        .map(|(label, count)| ChartSlice {
            label: label.to_owned(),
            count,
        })
        .collect();

    let samples = batch
        .failures
        .iter()
        .take(FAILURE_SAMPLE_LIMIT)
        .map(|failure| match failure.review_id {
            Some(id) => format!(
                "review {} (id {id}): {}: {}",
                failure.index, failure.kind, failure.reason
            ),
            None => format!("review {}: {}: {}", failure.index, failure.kind, failure.reason),
        })
        .collect();

    ReportPayload {
        generated_at: Utc::now(),
        total: batch.results.len(),
        counts: batch.sentiment_counts,
        rows,
        chart_data,
        top_issues,
        failures: FailureSummary {
            total: batch.failures.len(),
            samples,
        },
        cancelled: batch.cancelled,
    }
}

/// Truncates to [`EXCERPT_MAX_CHARS`] characters on a char boundary.
fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        text.to_owned()
    } else {
        text.chars().take(EXCERPT_MAX_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfa_core::{AnalysisResult, BatchFailure, FailureKind, Review};

    fn sample_batch() -> BatchResult {
        let mut batch = BatchResult::default();
        batch.push_result(AnalysisResult {
            review: Review::from_text("Car was clean but pickup took too long"),
            sentiment: SentimentLabel::Neutral,
            issues: vec!["Cleanliness concern", "Wait time issue"],
        });
        batch.push_result(AnalysisResult {
            review: Review::from_text("Excellent service! Will rent again"),
            sentiment: SentimentLabel::Positive,
            issues: vec![],
        });
        batch.push_failure(BatchFailure {
            index: 2,
            review_id: Some(7834),
            text: "Staff was rude and unhelpful".to_owned(),
            kind: FailureKind::Classification,
            reason: "NLU API error (status 503): unavailable".to_owned(),
        });
        batch
    }

    #[test]
    fn totals_and_counts_mirror_the_batch() {
        let payload = assemble(&sample_batch());
        assert_eq!(payload.total, 2);
        assert_eq!(payload.counts.positive, 1);
        assert_eq!(payload.counts.neutral, 1);
        assert_eq!(payload.counts.negative, 0);
        assert_eq!(payload.failures.total, 1);
        assert!(!payload.cancelled);
    }

    #[test]
    fn chart_data_covers_all_labels_in_fixed_order() {
        let payload = assemble(&sample_batch());
        let labels: Vec<&str> = payload.chart_data.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["positive", "neutral", "negative"]);
        let total: u64 = payload.chart_data.iter().map(|s| s.count).sum();
        assert_eq!(total as usize, payload.total);
    }

    #[test]
    fn top_issues_rank_by_frequency() {
        let payload = assemble(&sample_batch());
        let labels: Vec<&str> = payload.top_issues.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Cleanliness concern", "Wait time issue"]);
    }

    #[test]
    fn failure_samples_reference_the_review() {
        let payload = assemble(&sample_batch());
        assert_eq!(payload.failures.samples.len(), 1);
        assert!(payload.failures.samples[0].contains("id 7834"));
        assert!(payload.failures.samples[0].contains("classification"));
    }

    #[test]
    fn long_reviews_are_excerpted_on_char_boundaries() {
        let mut batch = BatchResult::default();
        let long_text = "é".repeat(250);
        batch.push_result(AnalysisResult {
            review: Review::from_text(long_text),
            sentiment: SentimentLabel::Neutral,
            issues: vec![],
        });
        let payload = assemble(&batch);
        assert_eq!(payload.rows[0].excerpt.chars().count(), 100);
    }

    #[test]
    fn payload_serializes_to_the_boundary_shape() {
        let payload = assemble(&sample_batch());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["counts"]["positive"], 1);
        assert_eq!(value["rows"][0]["sentiment"], "neutral");
        assert_eq!(value["rows"][0]["issues"][0], "Cleanliness concern");
        assert_eq!(value["chart_data"][0]["label"], "positive");
    }
}

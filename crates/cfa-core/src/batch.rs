use std::collections::BTreeMap;

use serde::Serialize;

use crate::review::{Review, SentimentLabel};

/// Outcome of analyzing one review. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub review: Review,
    pub sentiment: SentimentLabel,
    /// Matched issue categories, deduplicated and lexicographically sorted.
    pub issues: Vec<&'static str>,
}

/// Why a single review was skipped rather than analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Blank or missing review text; no outbound call was made.
    Input,
    /// The NLU call failed (transport, API error, malformed response,
    /// unrecognized label, or timeout).
    Classification,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Classification => f.write_str("classification"),
        }
    }
}

/// Per-review failure marker. The batch keeps going past these.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Position of the review in the input sequence.
    pub index: usize,
    pub review_id: Option<i64>,
    /// Original review text, so the failure is actionable without the input.
    pub text: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Per-label result totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentCounts {
    pub fn increment(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    #[must_use]
    pub fn get(self, label: SentimentLabel) -> u64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    #[must_use]
    pub fn total(self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// Accumulated outcome of one batch run.
///
/// Built incrementally by the batch runner and read-only afterwards.
/// Invariants: `sentiment_counts.total() == results.len()`;
/// `issue_counts[c]` equals the number of results whose `issues` contain
/// `c`; `results` and `failures` both preserve input order.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    pub results: Vec<AnalysisResult>,
    pub failures: Vec<BatchFailure>,
    pub sentiment_counts: SentimentCounts,
    /// Issue category name → number of reviews matching it. `BTreeMap`
    /// keeps report ordering stable.
    pub issue_counts: BTreeMap<&'static str, u64>,
    /// True when the batch was cut short by caller-initiated cancellation;
    /// `results`/`failures` then cover only the reviews settled so far.
    pub cancelled: bool,
}

impl BatchResult {
    /// Appends a successful result and updates the aggregate counters.
    pub fn push_result(&mut self, result: AnalysisResult) {
        self.sentiment_counts.increment(result.sentiment);
        for &issue in &result.issues {
            *self.issue_counts.entry(issue).or_insert(0) += 1;
        }
        self.results.push(result);
    }

    /// Records a per-review failure.
    pub fn push_failure(&mut self, failure: BatchFailure) {
        self.failures.push(failure);
    }

    /// Issue categories ranked by frequency, most common first; ties break
    /// lexicographically.
    #[must_use]
    pub fn top_issues(&self) -> Vec<(&'static str, u64)> {
        let mut ranked: Vec<(&'static str, u64)> = self
            .issue_counts
            .iter()
            .map(|(&name, &count)| (name, count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

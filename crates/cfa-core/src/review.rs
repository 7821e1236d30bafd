use serde::{Deserialize, Serialize};

/// A single customer feedback record.
///
/// `text` is the only field the analysis pipeline requires; `id` and
/// `rating` are carried through untouched for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Customer identifier from the input data, when present.
    pub id: Option<i64>,
    /// Free-text review body.
    pub text: String,
    /// Numeric rating from the input data, when present.
    pub rating: Option<f64>,
}

impl Review {
    /// Builds a review from bare text with no id or rating.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            rating: None,
        }
    }
}

/// Document-level sentiment polarity.
///
/// Parsed from the NLU service's label string after ASCII lowercasing.
/// Any label outside this closed set is an error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Parses a raw service label, case-insensitively.
    ///
    /// Returns `None` for anything outside the closed label set.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// All labels in display order.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Positive, Self::Neutral, Self::Negative]
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment classification of one text: label plus the service's
/// confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Score in the service's native range. Cached alongside the label but
    /// not propagated past analysis.
    pub score: f64,
}

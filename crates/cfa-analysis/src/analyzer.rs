//! Per-review analysis: sentiment lookup plus issue tagging.

use std::sync::Arc;

use cfa_core::{AnalysisResult, Review};
use cfa_nlu::{NluError, SentimentClassifier};

use crate::tagger;

/// Combines the sentiment classifier and the issue taxonomy to produce one
/// [`AnalysisResult`] per review.
///
/// The classifier is injected and shared; the analyzer itself holds no
/// mutable state.
pub struct ReviewAnalyzer {
    classifier: Arc<SentimentClassifier>,
}

impl ReviewAnalyzer {
    #[must_use]
    pub fn new(classifier: Arc<SentimentClassifier>) -> Self {
        Self { classifier }
    }

    /// Analyzes a single review.
    ///
    /// Issue tagging cannot fail; classification errors propagate
    /// unchanged. No retry or fallback happens here: transient transport
    /// errors are already retried inside the client, and batch-level
    /// failure policy belongs to the runner.
    ///
    /// # Errors
    ///
    /// Returns [`NluError`] when the sentiment call fails.
    pub async fn analyze(&self, review: &Review) -> Result<AnalysisResult, NluError> {
        let issues = tagger::tag(&review.text);
        let classification = self.classifier.classify(&review.text).await?;

        Ok(AnalysisResult {
            review: review.clone(),
            sentiment: classification.label,
            issues,
        })
    }
}

//! Batch orchestration over a sequence of reviews.
//!
//! Reviews are analyzed with bounded concurrency; the output preserves
//! input order regardless of completion order. A failed review is recorded
//! and the batch keeps going; one bad record never discards the rest of
//! the batch.

use futures::stream::{self, StreamExt};
use tokio::sync::watch;

use cfa_core::{AnalysisResult, BatchFailure, BatchResult, FailureKind, Review};

use crate::analyzer::ReviewAnalyzer;

/// Progress callback, invoked with the completed fraction in `[0, 1]` once
/// per settled review.
pub type ProgressFn = dyn Fn(f32) + Send + Sync;

/// Knobs for one batch run.
pub struct BatchOptions {
    /// Upper bound on concurrently in-flight review analyses.
    pub max_concurrent: usize,
    pub on_progress: Option<Box<ProgressFn>>,
    /// Cancellation signal: flip the watched value to `true` to stop the
    /// batch after the currently settling review.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            on_progress: None,
            cancel: None,
        }
    }
}

impl BatchOptions {
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

enum Outcome {
    Analyzed(AnalysisResult),
    Failed(BatchFailure),
}

/// Runs whole batches through a [`ReviewAnalyzer`].
pub struct BatchRunner {
    analyzer: ReviewAnalyzer,
}

impl BatchRunner {
    #[must_use]
    pub fn new(analyzer: ReviewAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Analyzes `reviews`, preserving input order in the result.
    ///
    /// Blank-text reviews are recorded as input failures without any
    /// outbound call. Classification failures are recorded per review and
    /// the batch continues. When the cancellation signal fires, in-flight
    /// work is abandoned and the partial batch settled so far is returned
    /// with `cancelled` set.
    pub async fn run(&self, reviews: Vec<Review>, mut opts: BatchOptions) -> BatchResult {
        let total = reviews.len();
        let mut batch = BatchResult::default();
        if total == 0 {
            return batch;
        }

        let cancel_fut = wait_cancelled(opts.cancel.take());
        tokio::pin!(cancel_fut);

        let analyzer = &self.analyzer;
        let mut pending = stream::iter(reviews.into_iter().enumerate())
            .map(move |(index, review)| settle(analyzer, index, review))
            .buffer_unordered(opts.max_concurrent.max(1));

        let mut settled: Vec<(usize, Outcome)> = Vec::with_capacity(total);
        let mut cancelled = false;
        loop {
            let next = tokio::select! {
                biased;
                () = &mut cancel_fut => {
                    cancelled = true;
                    break;
                }
                next = pending.next() => next,
            };
            let Some(entry) = next else { break };
            settled.push(entry);
            if let Some(on_progress) = opts.on_progress.as_deref() {
                #[allow(clippy::cast_precision_loss)]
                on_progress(settled.len() as f32 / total as f32);
            }
        }
        // Dropping the stream abandons any still-running classifications.
        drop(pending);

        if cancelled {
            tracing::info!(
                settled = settled.len(),
                total,
                "batch cancelled, returning partial result"
            );
        }

        settled.sort_unstable_by_key(|&(index, _)| index);
        for (_, outcome) in settled {
            match outcome {
                Outcome::Analyzed(result) => batch.push_result(result),
                Outcome::Failed(failure) => batch.push_failure(failure),
            }
        }
        batch.cancelled = cancelled;
        batch
    }
}

/// Resolves once the watched cancellation flag turns `true`; never
/// resolves when no receiver was supplied or the sender goes away.
async fn wait_cancelled(cancel: Option<watch::Receiver<bool>>) {
    if let Some(mut cancel) = cancel {
        loop {
            if *cancel.borrow_and_update() {
                return;
            }
            if cancel.changed().await.is_err() {
                break;
            }
        }
    }
    std::future::pending::<()>().await;
}

async fn settle(analyzer: &ReviewAnalyzer, index: usize, review: Review) -> (usize, Outcome) {
    if review.text.trim().is_empty() {
        tracing::warn!(review = index, "review text is empty, skipping");
        let failure = BatchFailure {
            index,
            review_id: review.id,
            text: review.text,
            kind: FailureKind::Input,
            reason: "review text is empty".to_owned(),
        };
        return (index, Outcome::Failed(failure));
    }

    match analyzer.analyze(&review).await {
        Ok(result) => (index, Outcome::Analyzed(result)),
        Err(e) => {
            tracing::warn!(
                review = index,
                error = %e,
                "classification failed, continuing batch"
            );
            let failure = BatchFailure {
                index,
                review_id: review.id,
                text: review.text,
                kind: FailureKind::Classification,
                reason: e.to_string(),
            };
            (index, Outcome::Failed(failure))
        }
    }
}

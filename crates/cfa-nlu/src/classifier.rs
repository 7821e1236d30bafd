//! Memoizing sentiment classifier.
//!
//! Two reviews with byte-identical text hit the remote service at most
//! once for the life of the process. The cache is an owned field of the
//! classifier, which is constructed once at startup and injected into the
//! pipeline.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use cfa_core::Classification;

use crate::client::NluClient;
use crate::error::NluError;

/// Classifier wrapping [`NluClient`] with an unbounded memoization cache.
///
/// Keys are the exact text content: case-sensitive, no normalization.
/// Concurrent `classify` calls for the same uncached text coalesce into a
/// single outbound request; a failed call leaves the key unpopulated so a
/// later call can retry. Unbounded growth is an accepted tradeoff for
/// batch-sized inputs; an LRU could replace the inner map without
/// changing the `classify` signature.
pub struct SentimentClassifier {
    client: NluClient,
    cache: Mutex<HashMap<String, Arc<OnceCell<Classification>>>>,
}

impl SentimentClassifier {
    #[must_use]
    pub fn new(client: NluClient) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Classifies `text`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Propagates [`NluError`] from the underlying client on cache misses.
    pub async fn classify(&self, text: &str) -> Result<Classification, NluError> {
        let cell = {
            let mut cache = self.cache.lock().expect("classification cache poisoned");
            Arc::clone(cache.entry(text.to_owned()).or_default())
        };

        // OnceCell serializes initializers, so concurrent misses for the
        // same key make exactly one outbound call.
        let classification = cell
            .get_or_try_init(|| async {
                tracing::debug!(chars = text.len(), "sentiment cache miss");
                self.client.analyze_sentiment(text).await
            })
            .await?;

        Ok(*classification)
    }

    /// Number of distinct texts currently cached (populated or in flight).
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache.lock().expect("classification cache poisoned").len()
    }
}

//! HTTP client for the Watson NLU `/v1/analyze` endpoint.
//!
//! Wraps `reqwest` with NLU-specific error handling, API key management,
//! and typed response deserialization. Only document sentiment is
//! requested; the response label is validated against the closed
//! [`SentimentLabel`] set rather than passed through raw.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use cfa_core::{AppConfig, Classification, SentimentLabel};

use crate::error::NluError;
use crate::retry::retry_with_backoff;

/// API version pin for the `/v1/analyze` endpoint.
const ANALYZE_VERSION: &str = "2023-06-01";

/// Client for the Watson NLU REST API.
///
/// Manages the HTTP client, API key, and resolved analyze URL. Use
/// [`NluClient::new`] with loaded configuration for production or
/// [`NluClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct NluClient {
    client: Client,
    api_key: String,
    analyze_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    features: Features,
}

#[derive(Serialize)]
struct Features {
    sentiment: SentimentFeature,
}

#[derive(Serialize)]
struct SentimentFeature {
    document: bool,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    sentiment: SentimentBlock,
}

#[derive(Deserialize)]
struct SentimentBlock {
    document: DocumentSentiment,
}

#[derive(Deserialize)]
struct DocumentSentiment {
    label: String,
    score: f64,
}

impl NluClient {
    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NluError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NluError::InvalidUrl`] if the
    /// configured service URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, NluError> {
        Self::build(
            &config.watson_api_key,
            &config.watson_nlu_url,
            config.nlu_timeout_secs,
            config.nlu_connect_timeout_secs,
            config.nlu_max_retries,
            config.nlu_retry_backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL and no retries (for testing
    /// with wiremock).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`NluClient::new`].
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NluError> {
        Self::build(api_key, base_url, timeout_secs, 10, 0, 0)
    }

    /// Overrides the retry policy. Mainly useful on test clients, which
    /// default to no retries.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn build(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, NluError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent("cfa/0.1 (feedback-analysis)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends to the instance path instead of replacing its last
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| NluError::InvalidUrl {
            url: base_url.to_owned(),
            reason,
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let mut analyze_url = base
            .join("v1/analyze")
            .map_err(|e| invalid(e.to_string()))?;
        analyze_url
            .query_pairs_mut()
            .append_pair("version", ANALYZE_VERSION);

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            analyze_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Classifies the document sentiment of `text`.
    ///
    /// Transient failures (timeouts, connection errors, 5xx) are retried
    /// with exponential back-off per the configured policy; everything else
    /// fails immediately.
    ///
    /// # Errors
    ///
    /// - [`NluError::Http`] on network failure or timeout.
    /// - [`NluError::Api`] if the service answers with a non-2xx status.
    /// - [`NluError::Deserialize`] if the response does not match the
    ///   expected shape.
    /// - [`NluError::UnrecognizedLabel`] if the label is outside the
    ///   positive/neutral/negative set.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<Classification, NluError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.analyze_once(text)
        })
        .await
    }

    async fn analyze_once(&self, text: &str) -> Result<Classification, NluError> {
        let request = AnalyzeRequest {
            text,
            features: Features {
                sentiment: SentimentFeature { document: true },
            },
        };

        let response = self
            .client
            .post(self.analyze_url.clone())
            .basic_auth("apikey", Some(&self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NluError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: AnalyzeResponse =
            serde_json::from_str(&body).map_err(|e| NluError::Deserialize {
                context: "v1/analyze".to_owned(),
                source: e,
            })?;

        let document = parsed.sentiment.document;
        let label = SentimentLabel::parse(&document.label)
            .ok_or(NluError::UnrecognizedLabel(document.label))?;

        Ok(Classification {
            label,
            score: document.score,
        })
    }
}

use thiserror::Error;

/// Errors returned by the Watson NLU adapter.
#[derive(Debug, Error)]
pub enum NluError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("NLU API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service returned a sentiment label outside the closed
    /// positive/neutral/negative set.
    #[error("unrecognized sentiment label: {0:?}")]
    UnrecognizedLabel(String),

    /// The configured service URL does not parse.
    #[error("invalid NLU service URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Application configuration, loaded from environment variables.
///
/// The Watson credentials are supplied externally (environment or `.env`)
/// and never appear in source or logs.
#[derive(Clone)]
pub struct AppConfig {
    pub watson_api_key: String,
    pub watson_nlu_url: String,
    pub log_level: String,
    pub nlu_timeout_secs: u64,
    pub nlu_connect_timeout_secs: u64,
    pub nlu_max_retries: u32,
    pub nlu_retry_backoff_base_ms: u64,
    pub max_concurrent_requests: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("watson_api_key", &"[redacted]")
            .field("watson_nlu_url", &self.watson_nlu_url)
            .field("log_level", &self.log_level)
            .field("nlu_timeout_secs", &self.nlu_timeout_secs)
            .field("nlu_connect_timeout_secs", &self.nlu_connect_timeout_secs)
            .field("nlu_max_retries", &self.nlu_max_retries)
            .field(
                "nlu_retry_backoff_base_ms",
                &self.nlu_retry_backoff_base_ms,
            )
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

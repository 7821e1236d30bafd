use thiserror::Error;

use crate::app_config::AppConfig;

/// Configuration-level errors. Fatal: no batch processing starts without a
/// valid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let watson_api_key = require("WATSON_API_KEY")?;
    let watson_nlu_url = require("WATSON_NLU_URL")?;

    let log_level = or_default("CFA_LOG_LEVEL", "info");
    let nlu_timeout_secs = parse_u64("CFA_NLU_TIMEOUT_SECS", "30")?;
    let nlu_connect_timeout_secs = parse_u64("CFA_NLU_CONNECT_TIMEOUT_SECS", "10")?;
    let nlu_max_retries = parse_u32("CFA_NLU_MAX_RETRIES", "3")?;
    let nlu_retry_backoff_base_ms = parse_u64("CFA_NLU_RETRY_BACKOFF_BASE_MS", "1000")?;
    let max_concurrent_requests = parse_usize("CFA_MAX_CONCURRENT_REQUESTS", "4")?;

    Ok(AppConfig {
        watson_api_key,
        watson_nlu_url,
        log_level,
        nlu_timeout_secs,
        nlu_connect_timeout_secs,
        nlu_max_retries,
        nlu_retry_backoff_base_ms,
        max_concurrent_requests,
    })
}

//! Core domain types and configuration for the feedback analyzer.
//!
//! Defines the review/analysis/batch data model shared by the NLU adapter,
//! the analysis pipeline, and the report assembler, plus the env-based
//! application configuration.

pub mod app_config;
pub mod batch;
pub mod config;
pub mod review;

pub use app_config::AppConfig;
pub use batch::{AnalysisResult, BatchFailure, BatchResult, FailureKind, SentimentCounts};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use review::{Classification, Review, SentimentLabel};

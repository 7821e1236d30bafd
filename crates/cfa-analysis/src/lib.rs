//! Feedback analysis pipeline.
//!
//! Combines the sentiment classifier with the issue taxonomy to produce
//! one [`cfa_core::AnalysisResult`] per review, and runs whole batches
//! with bounded concurrency, per-review failure recovery, progress
//! reporting, and cancellation.

pub mod analyzer;
pub mod runner;
pub mod tagger;

pub use analyzer::ReviewAnalyzer;
pub use runner::{BatchOptions, BatchRunner};
pub use tagger::{categories, tag};

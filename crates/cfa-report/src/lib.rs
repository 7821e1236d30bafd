//! Report assembly for completed feedback batches.
//!
//! Turns a frozen [`cfa_core::BatchResult`] into a serializable
//! [`ReportPayload`] and renders the markdown report document. Both are
//! pure consumers of the batch; no additional computation happens
//! downstream.

pub mod markdown;
pub mod payload;

pub use markdown::render_markdown;
pub use payload::{assemble, ChartSlice, FailureSummary, ReportPayload, ReportRow};

//! `analyze` and `categories` command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cfa_analysis::{tagger, BatchOptions, BatchRunner, ReviewAnalyzer};
use cfa_core::BatchResult;
use cfa_nlu::{NluClient, SentimentClassifier};
use cfa_report::{assemble, render_markdown};

use crate::input;

#[derive(Debug)]
pub(crate) struct AnalyzeArgs {
    pub input: Option<PathBuf>,
    pub demo: bool,
    pub json: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
}

/// Run a full analysis batch and print the summary.
///
/// Configuration is loaded first; a missing API key or service URL is
/// fatal before any input is read.
///
/// # Errors
///
/// Returns an error on configuration problems, unreadable input, or
/// failure to write the requested output files. Per-review analysis
/// failures are not errors; they land in the batch failure summary.
pub(crate) async fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = cfa_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let reviews = if args.demo {
        input::demo_reviews()
    } else if let Some(path) = args.input.as_deref() {
        input::load_reviews_csv(path)?
    } else {
        anyhow::bail!("no input: pass --input <csv> or --demo");
    };

    if reviews.is_empty() {
        println!("no reviews to analyze");
        return Ok(());
    }

    println!("analyzing {} reviews...", reviews.len());

    let client = NluClient::new(&config)?;
    let classifier = Arc::new(SentimentClassifier::new(client));
    let runner = BatchRunner::new(ReviewAnalyzer::new(classifier));

    let opts = BatchOptions::default()
        .with_max_concurrent(args.max_concurrent.unwrap_or(config.max_concurrent_requests))
        .with_progress(|fraction| tracing::debug!(fraction = f64::from(fraction), "batch progress"));

    let batch = runner.run(reviews, opts).await;
    print_summary(&batch);

    let payload = assemble(&batch);
    if let Some(path) = args.json {
        let json = serde_json::to_string_pretty(&payload).context("cannot serialize payload")?;
        std::fs::write(&path, json)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("report payload written to {}", path.display());
    }
    if let Some(path) = args.report {
        std::fs::write(&path, render_markdown(&payload))
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("markdown report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(batch: &BatchResult) {
    println!(
        "analysis complete: {} reviews analyzed, {} failed",
        batch.results.len(),
        batch.failures.len()
    );
    if batch.cancelled {
        println!("note: the batch was cancelled before completing");
    }

    println!();
    println!("{:<12}COUNT", "SENTIMENT");
    println!("{:<12}{}", "positive", batch.sentiment_counts.positive);
    println!("{:<12}{}", "neutral", batch.sentiment_counts.neutral);
    println!("{:<12}{}", "negative", batch.sentiment_counts.negative);

    let top = batch.top_issues();
    if !top.is_empty() {
        println!();
        println!("{:<25}COUNT", "ISSUE");
        for (name, count) in top {
            println!("{name:<25}{count}");
        }
    }

    if !batch.failures.is_empty() {
        println!();
        println!("failures:");
        for failure in batch.failures.iter().take(5) {
            println!(
                "  review {}: {}: {}",
                failure.index, failure.kind, failure.reason
            );
        }
        if batch.failures.len() > 5 {
            println!("  ... and {} more", batch.failures.len() - 5);
        }
    }
}

/// List the configured issue categories and their detection patterns.
pub(crate) fn run_categories() {
    println!("{:<25}PATTERN", "CATEGORY");
    for (name, pattern) in tagger::categories() {
        println!("{name:<25}{pattern}");
    }
}

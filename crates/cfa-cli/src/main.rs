mod analyze;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analyze::AnalyzeArgs;

#[derive(Debug, Parser)]
#[command(name = "cfa-cli")]
#[command(about = "Customer feedback analyzer command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a batch of reviews and print the sentiment/issue summary
    Analyze {
        /// CSV file with a `review` column (optional `customer_id`, `rating`)
        #[arg(long, conflicts_with = "demo")]
        input: Option<PathBuf>,

        /// Use the built-in demo dataset instead of a CSV file
        #[arg(long)]
        demo: bool,

        /// Write the report payload as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the markdown report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Override the configured concurrency limit
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
    /// List the configured issue categories and their patterns
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            demo,
            json,
            report,
            max_concurrent,
        } => {
            analyze::run_analyze(AnalyzeArgs {
                input,
                demo,
                json,
                report,
                max_concurrent,
            })
            .await
        }
        Commands::Categories => {
            analyze::run_categories();
            Ok(())
        }
    }
}

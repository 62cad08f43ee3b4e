//! SpendLens CLI - Expense analytics
//!
//! Usage:
//!   spendlens analyze --input request.json                Analyze a JSON request body
//!   spendlens analyze --expenses e.csv --categories c.csv Analyze CSV exports
//!   spendlens serve --port 5000                           Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            expenses,
            categories,
            json,
            output,
        } => {
            let source = match (input.as_deref(), expenses.as_deref()) {
                (Some(path), _) => commands::AnalysisSource::Json(path),
                (None, Some(expenses)) => commands::AnalysisSource::Csv {
                    expenses,
                    categories: categories.as_deref(),
                },
                (None, None) => anyhow::bail!("Pass --input or --expenses"),
            };
            commands::cmd_analyze(&source, json, output.as_deref())
        }
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => commands::cmd_serve(&host, port, allowed_origins).await,
    }
}

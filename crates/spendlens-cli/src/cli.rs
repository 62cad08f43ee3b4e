//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpendLens - Expense analytics from the command line
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Totals, category breakdown, monthly trend and budget status for your expenses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an expense batch from files
    ///
    /// Either pass a JSON request body with --input, or CSV exports with
    /// --expenses (and optionally --categories).
    Analyze {
        /// JSON file shaped like {"expenses": [...], "categories": [...]}
        #[arg(short, long, conflicts_with_all = ["expenses", "categories"], required_unless_present = "expenses")]
        input: Option<PathBuf>,

        /// Expenses CSV (columns: categoryId, amount, date)
        #[arg(long)]
        expenses: Option<PathBuf>,

        /// Categories CSV (columns: id, budget)
        #[arg(long, requires = "expenses")]
        categories: Option<PathBuf>,

        /// Print the result as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Also write the result as pretty JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable; defaults to SPENDLENS_ALLOWED_ORIGINS,
        /// then any origin)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },
}

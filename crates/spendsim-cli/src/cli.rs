//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Spendsim - Synthetic monthly spending for demos and tests
#[derive(Parser)]
#[command(name = "spendsim")]
#[command(about = "Generate, report on and summarize synthetic card spending", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Generator config file (defaults to the data dir override, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Currency symbol used when printing amounts
    #[arg(long, default_value = "£", global = true)]
    pub currency: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every command that generates a ledger
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Month to generate (1-12)
    #[arg(short, long)]
    pub month: u32,

    /// Random seed; the same seed always yields the same ledger
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Number of sampled transactions (defaults to the month's count range)
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Calendar year for timestamps (defaults to config, then current year)
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a month of transactions and print them
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Spending reports over a generated month
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Write a generated month to CSV (or JSON for a .json file)
    Export {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Summarize a generated month with the configured AI backend
    ///
    /// Falls back to the plain spending digest when no backend is configured
    /// or the request fails. Set OPENAI_COMPATIBLE_API_KEY (and optionally
    /// OPENAI_COMPATIBLE_HOST / OPENAI_COMPATIBLE_MODEL) to enable it.
    Summarize {
        #[command(flatten)]
        args: GenerateArgs,

        /// Number of earliest transactions to summarize
        #[arg(long, default_value_t = 20)]
        sample: usize,

        /// Model to ask instead of OPENAI_COMPATIBLE_MODEL
        #[arg(long)]
        model: Option<String>,
    },

    /// Show the active generator configuration
    Config {
        /// Print the built-in default config (TOML) instead
        #[arg(long)]
        default: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Spending by category, largest first
    Categories {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merchants with the highest total spending
    Merchants {
        #[command(flatten)]
        args: GenerateArgs,

        /// Number of merchants to show
        #[arg(short, long, default_value_t = 3)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spending per day over the month
    Daily {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Headline totals for the month
    Overview {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

//! Spendsim CLI - Synthetic spending simulator
//!
//! Usage:
//!   spendsim generate --month 9 --seed 42          Print a generated month
//!   spendsim report categories --month 9           Spending by category
//!   spendsim export --month 9 --file sept.csv      Write the month to CSV
//!   spendsim summarize --month 9                   AI summary (digest fallback)
//!   spendsim config                                Show the active configuration

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

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

    let config = cli.config.as_deref();
    let currency = cli.currency.as_str();

    match cli.command {
        Commands::Generate { args, json } => commands::cmd_generate(config, &args, currency, json),
        Commands::Report { report_type } => match report_type {
            ReportType::Categories { args, json } => {
                commands::cmd_report_categories(config, &args, currency, json)
            }
            ReportType::Merchants { args, limit, json } => {
                commands::cmd_report_merchants(config, &args, limit, currency, json)
            }
            ReportType::Daily { args, json } => {
                commands::cmd_report_daily(config, &args, currency, json)
            }
            ReportType::Overview { args, json } => {
                commands::cmd_report_overview(config, &args, currency, json)
            }
        },
        Commands::Export { args, file } => commands::cmd_export(config, &args, &file),
        Commands::Summarize {
            args,
            sample,
            model,
        } => commands::cmd_summarize(config, &args, currency, sample, model.as_deref()).await,
        Commands::Config { default } => commands::cmd_config(config, default, currency).await,
    }
}

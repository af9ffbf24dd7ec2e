//! Shared generation plumbing for commands

use std::path::Path;

use anyhow::{Context, Result};
use spendsim_core::config::load_config;
use spendsim_core::digest::month_name;
use spendsim_core::models::Transaction;
use spendsim_core::reports::sort_by_timestamp;
use spendsim_core::{GenerateRequest, TransactionGenerator};
use tracing::debug;

use crate::cli::GenerateArgs;

/// A generated month, sorted by timestamp
#[derive(Debug, Clone)]
pub struct Ledger {
    pub month: u32,
    pub year: i32,
    pub seed: u64,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    /// "September 2024"
    pub fn period(&self) -> String {
        match month_name(self.month) {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }

    pub fn total(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }
}

/// Load the generator config and build a generator, applying a year override
///
/// The year is pinned here so every timestamp and the ledger period agree.
pub fn open_generator(
    config_path: Option<&Path>,
    year: Option<i32>,
) -> Result<TransactionGenerator> {
    let loaded = load_config(config_path).context("Failed to load generator config")?;
    debug!(source = %loaded.source, "Using generator config");

    let mut config = loaded.config;
    config.year = Some(year.unwrap_or_else(|| config.resolve_year()));
    TransactionGenerator::new(config).context("Invalid generator config")
}

/// Generate the ledger described by `args`, sorted by timestamp
pub fn generate_ledger(config_path: Option<&Path>, args: &GenerateArgs) -> Result<Ledger> {
    let generator = open_generator(config_path, args.year)?;

    let mut request = GenerateRequest::new(args.month, args.seed);
    if let Some(count) = args.count {
        request = request.with_count(count);
    }

    let mut transactions = generator
        .generate(&request)
        .with_context(|| format!("Failed to generate transactions for month {}", args.month))?;
    sort_by_timestamp(&mut transactions);

    let year = generator.config().resolve_year();
    Ok(Ledger {
        month: args.month,
        year,
        seed: args.seed,
        transactions,
    })
}

//! Generate command implementation

use std::path::Path;

use anyhow::Result;

use super::{format_amount, format_timestamp, generate_ledger, truncate};
use crate::cli::GenerateArgs;

pub fn cmd_generate(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ledger.transactions)?);
        return Ok(());
    }

    println!();
    println!("🧾 Transactions: {} (seed {})", ledger.period(), ledger.seed);
    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {:16} │ {:22} │ {:16} │ {:>10}",
        "Date", "Merchant", "Category", "Amount"
    );
    println!("   ─────────────────┼────────────────────────┼──────────────────┼───────────");

    for tx in &ledger.transactions {
        println!(
            "   {:16} │ {:22} │ {:16} │ {:>10}",
            format_timestamp(&tx.timestamp),
            truncate(&tx.merchant, 22),
            truncate(tx.category.as_str(), 16),
            format_amount(currency, tx.amount)
        );
    }

    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {} transactions, total {}",
        ledger.transactions.len(),
        format_amount(currency, ledger.total())
    );
    println!();

    Ok(())
}

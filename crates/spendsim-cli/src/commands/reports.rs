//! Report command implementations

use std::path::Path;

use anyhow::Result;
use spendsim_core::reports::{category_totals, daily_totals, spending_overview, top_merchants};

use super::{format_amount, format_timestamp, generate_ledger, truncate};
use crate::cli::GenerateArgs;

/// Width of the bar in the daily chart at the busiest day
const BAR_WIDTH: usize = 30;

pub fn cmd_report_categories(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;
    let categories = category_totals(&ledger.transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    println!();
    println!("📊 Spending by Category: {}", ledger.period());
    println!("   ─────────────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No spending found for this month.");
        return Ok(());
    }

    println!("   Total: {}", format_amount(currency, ledger.total()));
    println!();
    println!(
        "   {:20} │ {:>12} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ─────────────────────┼──────────────┼────────┼───────");

    for cat in &categories {
        println!(
            "   {:20} │ {:>12} │ {:>5.1}% │ {:>5}",
            truncate(cat.category.as_str(), 20),
            format_amount(currency, cat.amount),
            cat.percentage,
            cat.transaction_count
        );
    }
    println!();

    Ok(())
}

pub fn cmd_report_merchants(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    limit: usize,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;
    let merchants = top_merchants(&ledger.transactions, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&merchants)?);
        return Ok(());
    }

    println!();
    println!("🏪 Top {} Merchants: {}", limit, ledger.period());
    println!("   ─────────────────────────────────────────────────────────────");

    if merchants.is_empty() {
        println!("   No spending found for this month.");
        return Ok(());
    }

    println!(
        "   {:>3}  {:24} │ {:>12} │ {:>5}",
        "#", "Merchant", "Amount", "Count"
    );
    println!("   ─────────────────────────────┼──────────────┼───────");

    for (rank, merchant) in merchants.iter().enumerate() {
        println!(
            "   {:>3}. {:24} │ {:>12} │ {:>5}",
            rank + 1,
            truncate(&merchant.merchant, 24),
            format_amount(currency, merchant.amount),
            merchant.transaction_count
        );
    }
    println!();

    Ok(())
}

pub fn cmd_report_daily(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;
    let days = daily_totals(&ledger.transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    println!();
    println!("📈 Spending Over Time: {}", ledger.period());
    println!("   ─────────────────────────────────────────────────────────────");

    if days.is_empty() {
        println!("   No spending found for this month.");
        return Ok(());
    }

    let max = days.iter().map(|d| d.amount).fold(0.0_f64, f64::max);

    println!(
        "   {:10} │ {:>12} │ {:>5} │",
        "Date", "Amount", "Count"
    );
    println!("   ───────────┼──────────────┼───────┼{}", "─".repeat(BAR_WIDTH + 1));

    for day in &days {
        println!(
            "   {:10} │ {:>12} │ {:>5} │ {}",
            day.date.format("%d/%m/%Y"),
            format_amount(currency, day.amount),
            day.transaction_count,
            bar(day.amount, max)
        );
    }
    println!();

    Ok(())
}

pub fn cmd_report_overview(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    currency: &str,
    json: bool,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;
    let overview = spending_overview(&ledger.transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!();
    println!("💷 Spending Overview: {}", ledger.period());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Transactions:   {}", overview.transaction_count);
    println!("   Total:          {}", format_amount(currency, overview.total));
    println!("   Average:        {}", format_amount(currency, overview.average));
    match &overview.largest {
        Some(tx) => println!(
            "   Largest:        {} at {} on {}",
            format_amount(currency, tx.amount),
            tx.merchant,
            format_timestamp(&tx.timestamp)
        ),
        None => println!("   Largest:        -"),
    }
    println!("   Weekend share:  {:.1}%", overview.weekend_percentage);
    println!();

    Ok(())
}

/// Horizontal bar proportional to `amount / max`
pub fn bar(amount: f64, max: f64) -> String {
    if max <= 0.0 || amount <= 0.0 {
        return String::new();
    }
    let width = ((amount / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.clamp(1, BAR_WIDTH))
}

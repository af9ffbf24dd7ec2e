//! Config command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendsim_core::ai::{AIBackend, AIClient};
use spendsim_core::config::{default_config_path, load_config, GeneratorConfig, DEFAULT_CONFIG};
use spendsim_core::prompts::{PromptId, PromptLibrary};

use super::{format_amount, truncate};

pub async fn cmd_config(
    config_path: Option<&Path>,
    show_default: bool,
    currency: &str,
) -> Result<()> {
    if show_default {
        print!("{}", DEFAULT_CONFIG);
        return Ok(());
    }

    let loaded = load_config(config_path).context("Failed to load generator config")?;
    let config = &loaded.config;

    println!();
    println!("⚙️  Generator Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source:        {}", loaded.source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }
    match config.year {
        Some(year) => println!("   Year:          {}", year),
        None => println!("   Year:          current ({})", config.resolve_year()),
    }
    println!("   Seed policy:   {}", config.seed_policy.as_str());
    println!(
        "   Count:         {}-{} per month",
        config.default_count.min, config.default_count.max
    );
    println!(
        "   Weekend:       x{} for {}",
        config.weekend_surcharge,
        config
            .weekend_categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    print_merchants(config);
    print_seasonal(config);
    print_recurring(config, currency);
    print_prompts();

    println!();
    println!("   AI backend:");
    println!("     {}", backend_status(AIClient::from_env().as_ref()).await);
    println!();

    Ok(())
}

fn print_merchants(config: &GeneratorConfig) {
    println!();
    if config.catalog.is_empty() {
        println!("   No base merchants; seasonal rules supply the catalog");
        return;
    }

    // Base weights may only be usable once seasonal adjustments apply
    let shares = config.weights.normalized(&config.catalog).ok();
    let column = if shares.is_some() { "Share" } else { "Weight" };

    println!("   {:24} │ {:18} │ {:>7}", "Merchant", "Category", column);
    println!("   ─────────────────────────┼────────────────────┼─────────");
    for (i, (merchant, category)) in config.catalog.iter().enumerate() {
        let value = match shares.as_ref().and_then(|s| s.get(i)) {
            Some(share) => format!("{:.1}%", share * 100.0),
            None => format!("{}", config.weights.weight_of(merchant)),
        };
        println!(
            "   {:24} │ {:18} │ {:>7}",
            truncate(merchant, 24),
            truncate(category.as_str(), 18),
            value
        );
    }
}

fn print_seasonal(config: &GeneratorConfig) {
    if config.seasonal.is_empty() && config.month_rules.is_empty() {
        return;
    }

    println!();
    println!("   Seasonal rules:");
    for rule in &config.seasonal {
        let months: Vec<String> = rule.months.iter().map(|m| m.to_string()).collect();
        let merchants: Vec<&str> = rule.merchants.iter().map(|(m, _)| m).collect();
        println!(
            "     {} (months {}): {}",
            rule.name,
            months.join(", "),
            merchants.join(", ")
        );
    }

    let mut months: Vec<_> = config.month_rules.iter().collect();
    months.sort_by_key(|(month, _)| **month);
    for (month, rule) in months {
        let count = config.count_range_for(*month);
        println!(
            "     month {:>2}: amounts x{}, {}-{} transactions",
            month, rule.multiplier, count.min, count.max
        );
    }
}

fn print_recurring(config: &GeneratorConfig, currency: &str) {
    if config.recurring.is_empty() {
        return;
    }

    println!();
    println!("   Recurring charges:");
    for charge in &config.recurring {
        println!(
            "     {:20} {:>10}  day {:>2} at {:02}:{:02} ({})",
            truncate(&charge.merchant, 20),
            format_amount(currency, charge.amount),
            charge.day,
            charge.hour,
            charge.minute,
            charge.category
        );
    }
}

fn print_prompts() {
    let library = PromptLibrary::new();

    println!();
    println!("   Prompts:");
    if let Some(dir) = library.override_dir() {
        println!("     override dir: {}", dir.display());
    }
    for id in PromptId::all() {
        let status = match library.override_path(*id) {
            Some(path) if library.has_override(*id) => format!("override ({})", path.display()),
            _ => "embedded".to_string(),
        };
        println!("     {:20} {}", id.as_str(), status);
    }
}

/// One-line description of the AI backend and whether it answers
pub async fn backend_status(client: Option<&AIClient>) -> String {
    let Some(client) = client else {
        return "not configured (set OPENAI_COMPATIBLE_API_KEY to enable summaries)".to_string();
    };

    let health = if client.health_check().await {
        "✅ connected"
    } else {
        "❌ unreachable"
    };
    format!("{} at {} {}", client.model(), client.host(), health)
}

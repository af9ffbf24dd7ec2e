//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ledger` - Shared generation plumbing (config loading, sorted ledgers)
//! - `generate` - Print a generated month as a table or JSON
//! - `reports` - Category, merchant, daily and overview reports
//! - `export` - CSV / JSON export
//! - `summarize` - AI summary with digest fallback
//! - `settings` - Show the active generator configuration

pub mod export;
pub mod generate;
pub mod ledger;
pub mod reports;
pub mod settings;
pub mod summarize;

// Re-export command functions for main.rs
pub use export::*;
pub use generate::*;
pub use ledger::*;
pub use reports::*;
pub use settings::*;
pub use summarize::*;

use chrono::NaiveDateTime;

/// Display format for transaction timestamps
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Amount with currency symbol and two decimals
pub fn format_amount(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, amount)
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

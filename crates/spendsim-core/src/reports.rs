//! Spending reports and analytics
//!
//! Pure reductions over a generated ledger. Every report accepts an empty
//! slice and returns an empty (or zeroed) result rather than an error.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{
    round_currency, Category, CategoryTotal, DailyTotal, MerchantSummary, SpendingOverview,
    Transaction,
};

/// Default number of merchants in a top-merchants report
pub const DEFAULT_TOP_MERCHANTS: usize = 3;

/// Total spending per category, largest first
///
/// Ties are broken by category name so the order is stable.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: HashMap<&Category, (f64, i64)> = HashMap::new();
    for tx in transactions {
        let entry = groups.entry(&tx.category).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let total: f64 = groups.values().map(|(amount, _)| amount).sum();

    let mut categories: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.clone(),
            amount: round_currency(amount),
            percentage: if total > 0.0 {
                (amount / total) * 100.0
            } else {
                0.0
            },
            transaction_count: count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    categories
}

/// Merchants with the highest total spending, at most `limit` of them
///
/// Ties are broken by merchant name.
pub fn top_merchants(transactions: &[Transaction], limit: usize) -> Vec<MerchantSummary> {
    let mut groups: HashMap<&str, (f64, i64)> = HashMap::new();
    for tx in transactions {
        let entry = groups.entry(tx.merchant.as_str()).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let mut merchants: Vec<MerchantSummary> = groups
        .into_iter()
        .map(|(merchant, (amount, count))| MerchantSummary {
            merchant: merchant.to_string(),
            amount: round_currency(amount),
            transaction_count: count,
        })
        .collect();

    merchants.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    merchants.truncate(limit);
    merchants
}

/// Spending per calendar day, oldest first
pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
    for tx in transactions {
        let entry = days.entry(tx.date()).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (amount, count))| DailyTotal {
            date,
            amount: round_currency(amount),
            transaction_count: count,
        })
        .collect()
}

/// Headline numbers: total, count, average, largest and weekend share
pub fn spending_overview(transactions: &[Transaction]) -> SpendingOverview {
    if transactions.is_empty() {
        return SpendingOverview::default();
    }

    let total: f64 = transactions.iter().map(|tx| tx.amount).sum();
    let weekend: f64 = transactions
        .iter()
        .filter(|tx| tx.is_weekend())
        .map(|tx| tx.amount)
        .sum();
    let count = transactions.len() as i64;

    // Earliest wins among equal amounts
    let largest = transactions
        .iter()
        .max_by(|a, b| {
            a.amount
                .total_cmp(&b.amount)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        })
        .cloned();

    SpendingOverview {
        total: round_currency(total),
        transaction_count: count,
        average: round_currency(total / count as f64),
        largest,
        weekend_percentage: if total > 0.0 {
            (weekend / total) * 100.0
        } else {
            0.0
        },
    }
}

/// Sort a ledger by timestamp (merchant name breaks ties)
pub fn sort_by_timestamp(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
}

//! Spending digest for AI summaries
//!
//! Condenses a ledger into the handful of facts a language model needs to
//! write a short summary: how many transactions, where most money went,
//! which merchants dominated, and how much happened at weekends.

use std::collections::HashMap;

use chrono::Month;
use serde::Serialize;

use crate::models::{CategoryTotal, MerchantSummary, Transaction};
use crate::reports::{category_totals, spending_overview, top_merchants, DEFAULT_TOP_MERCHANTS};

/// Number of leading categories mentioned in a digest
const TOP_CATEGORIES: usize = 3;

/// Facts about a set of transactions, ready for prompt rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingDigest {
    /// Human label for the period, e.g. "September 2024"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub transaction_count: usize,
    pub total: f64,
    pub top_categories: Vec<CategoryTotal>,
    pub top_merchants: Vec<MerchantSummary>,
    pub weekend_percentage: f64,
}

impl SpendingDigest {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let overview = spending_overview(transactions);
        let mut top_categories = category_totals(transactions);
        top_categories.truncate(TOP_CATEGORIES);

        Self {
            period: None,
            transaction_count: transactions.len(),
            total: overview.total,
            top_categories,
            top_merchants: top_merchants(transactions, DEFAULT_TOP_MERCHANTS),
            weekend_percentage: overview.weekend_percentage,
        }
    }

    /// Attach a period label such as "September 2024"
    pub fn with_period(mut self, month: u32, year: i32) -> Self {
        self.period = Some(match month_name(month) {
            Some(name) => format!("{} {}", name, year),
            None => year.to_string(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Plain-text rendering of the digest
    pub fn to_text(&self, currency: &str) -> String {
        let Some(highest) = self.top_categories.first() else {
            return "No spending recorded.".to_string();
        };

        let mut text = format!(
            "Over the past {} transactions, the highest spending was on {} ({}{:.2}).",
            self.transaction_count, highest.category, currency, highest.amount
        );

        match &self.top_categories[1..] {
            [] => {}
            [second] => text.push_str(&format!(" Another major area was {}.", second.category)),
            [second, third, ..] => text.push_str(&format!(
                " Other major areas include {} and {}.",
                second.category, third.category
            )),
        }

        if !self.top_merchants.is_empty() {
            let names: Vec<&str> = self
                .top_merchants
                .iter()
                .map(|m| m.merchant.as_str())
                .collect();
            text.push_str(&format!(
                " The merchants with the most spending were {}.",
                names.join(", ")
            ));
        }

        if self.weekend_percentage > 0.0 {
            text.push_str(&format!(
                " About {:.0}% of spending happened at weekends.",
                self.weekend_percentage
            ));
        }

        text
    }

    /// Template variables for prompt rendering
    pub fn template_vars(&self, currency: &str) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        vars.insert("digest", self.to_text(currency));
        vars.insert("transaction_count", self.transaction_count.to_string());
        vars.insert("total", format!("{}{:.2}", currency, self.total));
        if let Some(ref period) = self.period {
            vars.insert("period", period.clone());
        }
        vars
    }
}

/// English month name for 1-12
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

//! Domain models for spendsim

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Spending category
///
/// The fixed set covers the built-in catalog; `Other` carries categories
/// introduced by a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Groceries,
    Restaurants,
    Transport,
    Entertainment,
    Clothing,
    Shopping,
    Health,
    Travel,
    RentUtilities,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Groceries => "Groceries",
            Self::Restaurants => "Restaurants",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Clothing => "Clothing",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Travel => "Travel",
            Self::RentUtilities => "Rent & Utilities",
            Self::Other(name) => name,
        }
    }

    /// The built-in categories (excludes `Other`)
    pub fn builtin() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::Restaurants,
            Self::Transport,
            Self::Entertainment,
            Self::Clothing,
            Self::Shopping,
            Self::Health,
            Self::Travel,
            Self::RentUtilities,
        ]
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "groceries" => Self::Groceries,
            "restaurants" => Self::Restaurants,
            "transport" => Self::Transport,
            "entertainment" => Self::Entertainment,
            "clothing" => Self::Clothing,
            "shopping" => Self::Shopping,
            "health" => Self::Health,
            "travel" => Self::Travel,
            "rent & utilities" | "rent_utilities" | "rent and utilities" => Self::RentUtilities,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single synthetic card transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub category: Category,
    pub amount: f64,
    pub merchant: String,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Whether the transaction happened on a Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        is_weekend(self.timestamp.weekday())
    }
}

pub(crate) fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Spending for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: i64,
}

/// Merchant spending summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantSummary {
    pub merchant: String,
    pub amount: f64,
    pub transaction_count: i64,
}

/// Spending on a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
    pub transaction_count: i64,
}

/// Headline numbers for a set of transactions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendingOverview {
    pub total: f64,
    pub transaction_count: i64,
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<Transaction>,
    /// Share of total spending that happened on weekends (0-100)
    pub weekend_percentage: f64,
}

/// Round a currency amount to 2 decimal places
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

//! Merchant catalog, sampling weights and amount ranges
//!
//! The catalog maps each merchant to exactly one category. Merchants are kept
//! in name order so sampling is reproducible regardless of how the catalog
//! was assembled.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Category;

/// Mapping of merchant name to spending category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantCatalog {
    merchants: BTreeMap<String, Category>,
}

impl MerchantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or re-map) a merchant
    pub fn insert(&mut self, merchant: impl Into<String>, category: Category) {
        self.merchants.insert(merchant.into(), category);
    }

    /// Builder-style insert
    pub fn with(mut self, merchant: impl Into<String>, category: Category) -> Self {
        self.insert(merchant, category);
        self
    }

    /// Union in another catalog; its entries win on conflict
    pub fn extend(&mut self, other: &MerchantCatalog) {
        for (merchant, category) in &other.merchants {
            self.merchants.insert(merchant.clone(), category.clone());
        }
    }

    pub fn category_of(&self, merchant: &str) -> Option<&Category> {
        self.merchants.get(merchant)
    }

    pub fn contains(&self, merchant: &str) -> bool {
        self.merchants.contains_key(merchant)
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }

    /// Merchants in sampling order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.merchants.iter().map(|(m, c)| (m.as_str(), c))
    }
}

impl<S: Into<String>> FromIterator<(S, Category)> for MerchantCatalog {
    fn from_iter<I: IntoIterator<Item = (S, Category)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (merchant, category) in iter {
            catalog.insert(merchant, category);
        }
        catalog
    }
}

/// Per-merchant sampling weights
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MerchantWeights {
    /// Every merchant equally likely
    #[default]
    Uniform,
    /// Explicit weights; merchants missing from the table weigh 0.
    /// Weights need not sum to 1.
    Table(HashMap<String, f64>),
}

impl MerchantWeights {
    /// Raw weight for a merchant
    pub fn weight_of(&self, merchant: &str) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::Table(table) => table.get(merchant).copied().unwrap_or(0.0),
        }
    }

    /// Overlay adjustments on top of these weights.
    ///
    /// A uniform base becomes a table where every catalog merchant weighs 1.
    pub fn adjusted(&self, catalog: &MerchantCatalog, adjustments: &HashMap<String, f64>) -> Self {
        if adjustments.is_empty() {
            return self.clone();
        }
        let mut table: HashMap<String, f64> = match self {
            Self::Uniform => catalog.iter().map(|(m, _)| (m.to_string(), 1.0)).collect(),
            Self::Table(table) => table.clone(),
        };
        for (merchant, weight) in adjustments {
            table.insert(merchant.clone(), *weight);
        }
        Self::Table(table)
    }

    /// Weight vector over the catalog, normalized to sum to 1
    pub fn normalized(&self, catalog: &MerchantCatalog) -> Result<Vec<f64>> {
        let raw: Vec<f64> = catalog.iter().map(|(m, _)| self.weight_of(m)).collect();

        if let Some((merchant, weight)) = catalog
            .iter()
            .map(|(m, _)| m)
            .zip(&raw)
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(Error::Configuration(format!(
                "Weight for merchant '{}' must be a non-negative number, got {}",
                merchant, weight
            )));
        }

        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(Error::Configuration(
                "All merchant weights are zero; nothing can be sampled".into(),
            ));
        }

        Ok(raw.into_iter().map(|w| w / total).collect())
    }
}

/// Closed-open uniform range for transaction amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, label: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.01 || self.min > self.max
        {
            return Err(Error::Configuration(format!(
                "Amount range for {} must satisfy 0.01 <= min <= max, got {}..{}",
                label, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Category-conditioned amount ranges with a fallback for unlisted categories
#[derive(Debug, Clone, PartialEq)]
pub struct AmountRanges {
    pub ranges: HashMap<Category, AmountRange>,
    pub fallback: AmountRange,
}

impl AmountRanges {
    pub fn range_for(&self, category: &Category) -> AmountRange {
        self.ranges.get(category).copied().unwrap_or(self.fallback)
    }

    pub fn validate(&self) -> Result<()> {
        self.fallback.validate("default")?;
        for (category, range) in &self.ranges {
            range.validate(category.as_str())?;
        }
        Ok(())
    }
}

impl Default for AmountRanges {
    fn default() -> Self {
        let ranges = [
            (Category::Groceries, AmountRange::new(15.0, 55.0)),
            (Category::Restaurants, AmountRange::new(12.0, 35.0)),
            (Category::Transport, AmountRange::new(5.0, 25.0)),
            (Category::Shopping, AmountRange::new(15.0, 70.0)),
            (Category::Clothing, AmountRange::new(20.0, 80.0)),
            (Category::Entertainment, AmountRange::new(15.0, 65.0)),
            (Category::Health, AmountRange::new(8.0, 40.0)),
            (Category::Travel, AmountRange::new(80.0, 250.0)),
        ]
        .into_iter()
        .collect();

        Self {
            ranges,
            fallback: AmountRange::new(5.0, 50.0),
        }
    }
}

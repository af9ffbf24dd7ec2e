//! Synthetic transaction generator
//!
//! Produces one month of card transactions from a [`GeneratorConfig`]:
//! weighted merchant sampling, category-conditioned amounts, month scaling,
//! a weekend surcharge for sensitive categories, and fixed recurring bills.
//!
//! Each call seeds its own `StdRng`, so identical requests against the same
//! configuration always yield identical ledgers. Random draws happen in a
//! fixed order per transaction: merchant, amount, day, hour, minute.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::catalog::AmountRange;
use crate::config::{GeneratorConfig, RecurringCharge};
use crate::error::{Error, Result};
use crate::models::{is_weekend, round_currency, Category, Transaction};

/// Day offsets are drawn from `[0, DAY_WINDOW)`, clamped to the month length
pub const DAY_WINDOW: u32 = 30;

/// First and last-exclusive hour of sampled transactions
pub const HOURS: std::ops::Range<u32> = 8..22;

/// Smallest amount a transaction can carry after rounding
const MIN_AMOUNT: f64 = 0.01;

/// Parameters for a single generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerateRequest {
    /// Number of sampled transactions (None = draw from the month's count range)
    pub count: Option<u32>,
    /// Calendar month, 1-12
    pub month: u32,
    pub seed: u64,
}

impl GenerateRequest {
    pub fn new(month: u32, seed: u64) -> Self {
        Self {
            count: None,
            month,
            seed,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

/// Transaction generator bound to a validated configuration
#[derive(Debug, Clone)]
pub struct TransactionGenerator {
    config: GeneratorConfig,
}

impl TransactionGenerator {
    /// Create a generator, validating the configuration up front
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generator using the built-in default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the sampled transactions followed by the recurring bills.
    ///
    /// The result is in generation order; callers sort by timestamp for display.
    pub fn generate(&self, request: &GenerateRequest) -> Result<Vec<Transaction>> {
        let month = request.month;
        validate_month(month)?;
        if request.count == Some(0) {
            return Err(Error::Configuration(
                "Transaction count must be positive".into(),
            ));
        }

        let year = self.config.resolve_year();
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            Error::Configuration(format!("Invalid year/month: {}-{:02}", year, month))
        })?;
        let month_days = days_in_month(year, month);
        let window = DAY_WINDOW.min(month_days);

        let catalog = self.config.catalog_for_month(month);
        if catalog.is_empty() {
            return Err(Error::Configuration(format!(
                "Merchant catalog for month {} is empty",
                month
            )));
        }
        let merchants: Vec<(&str, &Category)> = catalog.iter().collect();
        let weights = self.config.weights_for_month(month).normalized(&catalog)?;
        let sampler = WeightedIndex::new(&weights)
            .map_err(|e| Error::Configuration(format!("Invalid merchant weights: {}", e)))?;

        let rng_seed = self.config.seed_policy.resolve(request.seed, month);
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let count = match request.count {
            Some(count) => count,
            None => {
                let range = self.config.count_range_for(month);
                rng.gen_range(range.min..=range.max)
            }
        };

        let multiplier = self.config.multiplier_for(month);
        debug!(
            year,
            month,
            seed = request.seed,
            rng_seed,
            count,
            merchants = merchants.len(),
            multiplier,
            "Generating transactions"
        );

        let mut transactions =
            Vec::with_capacity(count as usize + self.config.recurring.len());

        for _ in 0..count {
            let (merchant, category) = merchants[sampler.sample(&mut rng)];

            let range = self.config.amount_ranges.range_for(category);
            let mut amount = sample_amount(&mut rng, range) * multiplier;

            let day_offset = rng.gen_range(0..window);
            let date = first_day.with_day(day_offset + 1).ok_or_else(|| {
                Error::InvalidData(format!("Day offset {} out of range", day_offset))
            })?;
            if is_weekend(date.weekday()) && self.config.is_weekend_sensitive(category) {
                amount *= self.config.weekend_surcharge;
            }

            let hour = rng.gen_range(HOURS);
            let minute = rng.gen_range(0..60);

            transactions.push(Transaction {
                timestamp: at(date, hour, minute)?,
                category: category.clone(),
                amount: round_currency(amount).max(MIN_AMOUNT),
                merchant: merchant.to_string(),
            });
        }

        for charge in &self.config.recurring {
            transactions.push(recurring_transaction(charge, first_day, month_days)?);
        }

        debug!(total = transactions.len(), "Generated transactions");
        Ok(transactions)
    }
}

impl Default for TransactionGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Reject months outside 1-12
pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(Error::Configuration(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}

/// Number of days in a calendar month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn sample_amount(rng: &mut StdRng, range: AmountRange) -> f64 {
    if range.min < range.max {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Result<NaiveDateTime> {
    date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
        Error::InvalidData(format!("Invalid time {:02}:{:02} on {}", hour, minute, date))
    })
}

fn recurring_transaction(
    charge: &RecurringCharge,
    first_day: NaiveDate,
    month_days: u32,
) -> Result<Transaction> {
    let day = charge.day.clamp(1, month_days);
    let date = first_day
        .with_day(day)
        .ok_or_else(|| Error::InvalidData(format!("Invalid recurring day {}", day)))?;

    Ok(Transaction {
        timestamp: at(date, charge.hour, charge.minute)?,
        category: charge.category.clone(),
        amount: round_currency(charge.amount).max(MIN_AMOUNT),
        merchant: charge.merchant.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AmountRanges, MerchantCatalog, MerchantWeights};
    use crate::config::{MonthRule, SeedPolicy};
    use chrono::Timelike;
    use std::collections::HashMap;

    fn config_2024() -> GeneratorConfig {
        GeneratorConfig {
            year: Some(2024),
            ..Default::default()
        }
    }

    /// One merchant with a fixed amount, no recurring bills
    fn single_merchant_config(merchant: &str, category: Category, amount: f64) -> GeneratorConfig {
        let mut amount_ranges = AmountRanges::default();
        amount_ranges
            .ranges
            .insert(category.clone(), AmountRange::new(amount, amount));
        GeneratorConfig {
            year: Some(2024),
            catalog: MerchantCatalog::new().with(merchant, category),
            weights: MerchantWeights::Uniform,
            amount_ranges,
            seasonal: vec![],
            month_rules: HashMap::new(),
            recurring: vec![],
            ..Default::default()
        }
    }

    fn is_two_decimal(amount: f64) -> bool {
        ((amount * 100.0).round() - amount * 100.0).abs() < 1e-6
    }

    #[test]
    fn test_same_request_is_deterministic() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let request = GenerateRequest::new(9, 42).with_count(10);

        let first = generator.generate(&request).unwrap();
        let second = generator.generate(&request).unwrap();

        assert_eq!(first.len(), 10 + generator.config().recurring.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_separate_generators_agree() {
        let request = GenerateRequest::new(3, 7).with_count(25);
        let a = TransactionGenerator::new(config_2024())
            .unwrap()
            .generate(&request)
            .unwrap();
        let b = TransactionGenerator::new(config_2024())
            .unwrap()
            .generate(&request)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let a = generator
            .generate(&GenerateRequest::new(9, 1).with_count(20))
            .unwrap();
        let b = generator
            .generate(&GenerateRequest::new(9, 2).with_count(20))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_count_is_configuration_error() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let err = generator
            .generate(&GenerateRequest::new(9, 1).with_count(0))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_month_is_configuration_error() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        for month in [0, 13, 99] {
            let err = generator
                .generate(&GenerateRequest::new(month, 1).with_count(5))
                .unwrap_err();
            assert!(err.is_configuration(), "month {} should fail", month);
        }
    }

    #[test]
    fn test_all_zero_weights_is_configuration_error() {
        let config = GeneratorConfig {
            weights: MerchantWeights::Table(HashMap::from([("Tesco".to_string(), 0.0)])),
            ..config_2024()
        };
        let generator = TransactionGenerator::new(config).unwrap();
        let err = generator
            .generate(&GenerateRequest::new(9, 1).with_count(5))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_catalog_rejected_at_construction() {
        let config = GeneratorConfig {
            catalog: MerchantCatalog::new(),
            seasonal: vec![],
            recurring: vec![],
            ..config_2024()
        };
        assert!(TransactionGenerator::new(config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_empty_month_catalog_rejected() {
        // Only seasonal merchants: valid config, but September has nothing to sample
        let mut config = config_2024();
        config.catalog = MerchantCatalog::new();
        config.weights = MerchantWeights::Uniform;
        config.recurring = vec![];
        let generator = TransactionGenerator::new(config).unwrap();

        assert!(generator
            .generate(&GenerateRequest::new(9, 1).with_count(5))
            .unwrap_err()
            .is_configuration());
        assert!(generator
            .generate(&GenerateRequest::new(7, 1).with_count(5))
            .is_ok());
    }

    #[test]
    fn test_transaction_invariants_hold_for_every_month() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let recurring: Vec<&str> = generator
            .config()
            .recurring
            .iter()
            .map(|r| r.merchant.as_str())
            .collect();

        for month in 1..=12 {
            for seed in [1, 42, 9_999] {
                let catalog = generator.config().catalog_for_month(month);
                let transactions = generator
                    .generate(&GenerateRequest::new(month, seed).with_count(200))
                    .unwrap();

                for tx in &transactions {
                    assert!(tx.amount > 0.0);
                    assert!(is_two_decimal(tx.amount), "{} has > 2 dp", tx.amount);
                    assert_eq!(tx.timestamp.month(), month);
                    assert_eq!(tx.timestamp.year(), 2024);
                    assert!(HOURS.contains(&tx.timestamp.hour()));
                    assert!(tx.timestamp.minute() < 60);

                    if !recurring.contains(&tx.merchant.as_str()) {
                        assert_eq!(catalog.category_of(&tx.merchant), Some(&tx.category));
                        assert!(tx.timestamp.day() <= DAY_WINDOW);
                    }
                }
            }
        }
    }

    #[test]
    fn test_february_never_rolls_into_march() {
        let generator = TransactionGenerator::new(GeneratorConfig {
            year: Some(2023),
            ..Default::default()
        })
        .unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(2, 5).with_count(2_000))
            .unwrap();

        assert!(transactions.iter().all(|tx| tx.timestamp.month() == 2));
        // 2023 is not a leap year: every day 1-28 is reachable, nothing beyond
        let max_day = transactions.iter().map(|tx| tx.timestamp.day()).max();
        assert_eq!(max_day, Some(28));
    }

    #[test]
    fn test_long_month_keeps_thirty_day_window() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(1, 5).with_count(2_000))
            .unwrap();
        let max_day = transactions.iter().map(|tx| tx.timestamp.day()).max();
        assert_eq!(max_day, Some(30));
    }

    #[test]
    fn test_weekend_surcharge_only_for_sensitive_categories() {
        let mut config = single_merchant_config("Starbucks", Category::Restaurants, 10.0);
        config.weekend_surcharge = 1.5;
        let generator = TransactionGenerator::new(config).unwrap();

        let transactions = generator
            .generate(&GenerateRequest::new(9, 3).with_count(300))
            .unwrap();
        assert!(transactions.iter().any(|tx| tx.is_weekend()));
        for tx in &transactions {
            let expected = if tx.is_weekend() { 15.0 } else { 10.0 };
            assert_eq!(tx.amount, expected);
        }

        let mut config = single_merchant_config("Tesco", Category::Groceries, 10.0);
        config.weekend_surcharge = 1.5;
        let generator = TransactionGenerator::new(config).unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(9, 3).with_count(300))
            .unwrap();
        assert!(transactions.iter().all(|tx| tx.amount == 10.0));
    }

    #[test]
    fn test_month_multiplier_scales_amounts() {
        let mut config = single_merchant_config("Tesco", Category::Groceries, 10.0);
        config.month_rules.insert(
            11,
            MonthRule {
                multiplier: 2.0,
                count: None,
            },
        );
        let generator = TransactionGenerator::new(config).unwrap();

        let november = generator
            .generate(&GenerateRequest::new(11, 1).with_count(20))
            .unwrap();
        assert!(november.iter().all(|tx| tx.amount == 20.0));

        let october = generator
            .generate(&GenerateRequest::new(10, 1).with_count(20))
            .unwrap();
        assert!(october.iter().all(|tx| tx.amount == 10.0));
    }

    #[test]
    fn test_seasonal_merchants_only_in_seasonal_months() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let seasonal = ["Ryanair", "Airbnb", "Trainline"];

        let september = generator
            .generate(&GenerateRequest::new(9, 11).with_count(1_000))
            .unwrap();
        assert!(september
            .iter()
            .all(|tx| !seasonal.contains(&tx.merchant.as_str())));

        let july = generator
            .generate(&GenerateRequest::new(7, 11).with_count(1_000))
            .unwrap();
        assert!(july.iter().any(|tx| seasonal.contains(&tx.merchant.as_str())));
        assert!(july.iter().any(|tx| tx.category == Category::Travel));
    }

    #[test]
    fn test_unweighted_merchants_never_sampled() {
        let config = GeneratorConfig {
            weights: MerchantWeights::Table(HashMap::from([("Tesco".to_string(), 2.5)])),
            ..config_2024()
        };
        let generator = TransactionGenerator::new(config).unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(9, 8).with_count(200))
            .unwrap();

        let sampled = &transactions[..200];
        assert!(sampled.iter().all(|tx| tx.merchant == "Tesco"));
    }

    #[test]
    fn test_omitted_count_uses_month_range() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let recurring = generator.config().recurring.len();

        for seed in 0..20 {
            let september = generator.generate(&GenerateRequest::new(9, seed)).unwrap();
            let sampled = september.len() - recurring;
            assert!((45..=60).contains(&sampled), "got {}", sampled);

            let december = generator.generate(&GenerateRequest::new(12, seed)).unwrap();
            let sampled = december.len() - recurring;
            assert!((60..=80).contains(&sampled), "got {}", sampled);
        }
    }

    #[test]
    fn test_recurring_charges_appended_last() {
        let generator = TransactionGenerator::new(config_2024()).unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(9, 42).with_count(10))
            .unwrap();

        let landlord = &transactions[10];
        assert_eq!(landlord.merchant, "Landlord");
        assert_eq!(landlord.category, Category::RentUtilities);
        assert_eq!(landlord.amount, 950.0);
        assert_eq!(
            landlord.timestamp,
            NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(transactions[11].merchant, "Vodafone");
        assert_eq!(transactions[11].amount, 45.0);
    }

    #[test]
    fn test_recurring_day_clamped_to_month_length() {
        let mut config = single_merchant_config("Tesco", Category::Groceries, 10.0);
        config.recurring = vec![RecurringCharge {
            merchant: "Gym".to_string(),
            category: Category::Health,
            amount: 29.99,
            day: 31,
            hour: 7,
            minute: 15,
        }];
        let generator = TransactionGenerator::new(config).unwrap();
        let transactions = generator
            .generate(&GenerateRequest::new(2, 1).with_count(1))
            .unwrap();

        let gym = transactions.last().unwrap();
        assert_eq!(gym.timestamp.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(gym.amount, 29.99);
    }

    #[test]
    fn test_seed_policies_line_up() {
        let offset = TransactionGenerator::new(config_2024()).unwrap();
        let exact = TransactionGenerator::new(GeneratorConfig {
            seed_policy: SeedPolicy::Exact,
            ..config_2024()
        })
        .unwrap();

        let a = offset
            .generate(&GenerateRequest::new(9, 100).with_count(15))
            .unwrap();
        let b = exact
            .generate(&GenerateRequest::new(9, 109).with_count(15))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 9), 30);
    }
}

//! Generator configuration
//!
//! Everything the transaction generator needs beyond `(count, month, seed)`:
//! merchant catalog, sampling weights, amount ranges, seasonal extensions,
//! month scaling, weekend surcharge and recurring bills.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or override in data dir (~/.local/share/spendsim/config/generator.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Sections present in an override file replace the matching defaults.
//! `[amounts]` and `[[months]]` merge per key instead.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::Deserialize;

use crate::catalog::{AmountRange, AmountRanges, MerchantCatalog, MerchantWeights};
use crate::error::{Error, Result};
use crate::models::Category;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/generator.toml");

/// How the caller's seed becomes the RNG seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// `seed + month`, so each month of the same seed differs
    #[default]
    OffsetByMonth,
    /// Use the seed unchanged
    Exact,
}

impl SeedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffsetByMonth => "offset_by_month",
            Self::Exact => "exact",
        }
    }

    /// Effective RNG seed for a month
    pub fn resolve(&self, seed: u64, month: u32) -> u64 {
        match self {
            Self::OffsetByMonth => seed.wrapping_add(u64::from(month)),
            Self::Exact => seed,
        }
    }
}

impl std::str::FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "offset_by_month" | "offset" => Ok(Self::OffsetByMonth),
            "exact" | "fixed" => Ok(Self::Exact),
            _ => Err(format!("Unknown seed policy: {}", s)),
        }
    }
}

/// Closed range for the number of sampled transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.min == 0 || self.min > self.max {
            return Err(Error::Configuration(format!(
                "Count range for {} must satisfy 1 <= min <= max, got {}..={}",
                label, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Extra merchants (and weight adjustments) for specific months
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalRule {
    pub name: String,
    pub months: Vec<u32>,
    pub merchants: MerchantCatalog,
    pub weights: HashMap<String, f64>,
}

impl SeasonalRule {
    pub fn applies_to(&self, month: u32) -> bool {
        self.months.contains(&month)
    }
}

/// Month-level amount scaling and count range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthRule {
    pub multiplier: f64,
    pub count: Option<CountRange>,
}

impl Default for MonthRule {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            count: None,
        }
    }
}

/// A fixed monthly bill appended after sampling
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringCharge {
    pub merchant: String,
    pub category: Category,
    pub amount: f64,
    /// Day of month (1-based); clamped to the month length
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Full generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Calendar year for timestamps (None = current local year)
    pub year: Option<i32>,
    pub seed_policy: SeedPolicy,
    pub catalog: MerchantCatalog,
    pub weights: MerchantWeights,
    pub amount_ranges: AmountRanges,
    pub seasonal: Vec<SeasonalRule>,
    pub month_rules: HashMap<u32, MonthRule>,
    pub default_count: CountRange,
    pub weekend_surcharge: f64,
    pub weekend_categories: Vec<Category>,
    pub recurring: Vec<RecurringCharge>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            year: None,
            seed_policy: SeedPolicy::OffsetByMonth,
            catalog: default_catalog(),
            weights: default_weights(),
            amount_ranges: AmountRanges::default(),
            seasonal: default_seasonal(),
            month_rules: default_month_rules(),
            default_count: CountRange::new(45, 60),
            weekend_surcharge: 1.2,
            weekend_categories: vec![Category::Restaurants, Category::Entertainment],
            recurring: default_recurring(),
        }
    }
}

impl GeneratorConfig {
    /// Year used for timestamps
    pub fn resolve_year(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Whether any seasonal rule extends the catalog for this month
    pub fn is_seasonal(&self, month: u32) -> bool {
        self.seasonal.iter().any(|rule| rule.applies_to(month))
    }

    /// Catalog active for a month: base mapping plus matching seasonal merchants
    pub fn catalog_for_month(&self, month: u32) -> MerchantCatalog {
        let mut catalog = self.catalog.clone();
        for rule in self.seasonal.iter().filter(|r| r.applies_to(month)) {
            catalog.extend(&rule.merchants);
        }
        catalog
    }

    /// Sampling weights for a month, with seasonal adjustments applied
    pub fn weights_for_month(&self, month: u32) -> MerchantWeights {
        let catalog = self.catalog_for_month(month);
        let mut adjustments = HashMap::new();
        for rule in self.seasonal.iter().filter(|r| r.applies_to(month)) {
            adjustments.extend(rule.weights.iter().map(|(m, w)| (m.clone(), *w)));
        }
        self.weights.adjusted(&catalog, &adjustments)
    }

    pub fn multiplier_for(&self, month: u32) -> f64 {
        self.month_rules
            .get(&month)
            .map(|r| r.multiplier)
            .unwrap_or(1.0)
    }

    pub fn count_range_for(&self, month: u32) -> CountRange {
        self.month_rules
            .get(&month)
            .and_then(|r| r.count)
            .unwrap_or(self.default_count)
    }

    pub fn is_weekend_sensitive(&self, category: &Category) -> bool {
        self.weekend_categories.contains(category)
    }

    /// Check the whole configuration for values the generator cannot use
    pub fn validate(&self) -> Result<()> {
        if self.catalog.is_empty() && self.seasonal.iter().all(|r| r.merchants.is_empty()) {
            return Err(Error::Configuration("Merchant catalog is empty".into()));
        }

        self.amount_ranges.validate()?;
        self.default_count.validate("default")?;

        if !self.weekend_surcharge.is_finite() || self.weekend_surcharge <= 0.0 {
            return Err(Error::Configuration(format!(
                "Weekend surcharge must be positive, got {}",
                self.weekend_surcharge
            )));
        }

        for rule in &self.seasonal {
            if let Some(month) = rule.months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(Error::Configuration(format!(
                    "Seasonal rule '{}' lists invalid month {}",
                    rule.name, month
                )));
            }
        }

        for (month, rule) in &self.month_rules {
            if !(1..=12).contains(month) {
                return Err(Error::Configuration(format!(
                    "Month rule for invalid month {}",
                    month
                )));
            }
            if !rule.multiplier.is_finite() || rule.multiplier <= 0.0 {
                return Err(Error::Configuration(format!(
                    "Multiplier for month {} must be positive, got {}",
                    month, rule.multiplier
                )));
            }
            if let Some(count) = rule.count {
                count.validate(&format!("month {}", month))?;
            }
        }

        for charge in &self.recurring {
            self.validate_recurring(charge)?;
        }

        Ok(())
    }

    fn validate_recurring(&self, charge: &RecurringCharge) -> Result<()> {
        if !charge.amount.is_finite() || charge.amount < 0.01 {
            return Err(Error::Configuration(format!(
                "Recurring charge '{}' must have a positive amount, got {}",
                charge.merchant, charge.amount
            )));
        }
        if !(1..=31).contains(&charge.day) || charge.hour > 23 || charge.minute > 59 {
            return Err(Error::Configuration(format!(
                "Recurring charge '{}' has invalid schedule: day {} {:02}:{:02}",
                charge.merchant, charge.day, charge.hour, charge.minute
            )));
        }

        // A merchant maps to exactly one category everywhere it appears
        let known = std::iter::once(&self.catalog)
            .chain(self.seasonal.iter().map(|r| &r.merchants))
            .filter_map(|c| c.category_of(&charge.merchant));
        for category in known {
            if category != &charge.category {
                return Err(Error::Configuration(format!(
                    "Recurring charge '{}' uses category {} but the catalog maps it to {}",
                    charge.merchant, charge.category, category
                )));
            }
        }
        Ok(())
    }
}

fn default_catalog() -> MerchantCatalog {
    [
        ("Tesco", Category::Groceries),
        ("M&S", Category::Groceries),
        ("Starbucks", Category::Restaurants),
        ("Pizza Hut", Category::Restaurants),
        ("Uber", Category::Transport),
        ("Shell", Category::Transport),
        ("Vue Cinema", Category::Entertainment),
        ("Arcade", Category::Entertainment),
        ("H&M", Category::Clothing),
        ("Costco", Category::Shopping),
        ("Amazon", Category::Shopping),
        ("IKEA", Category::Shopping),
        ("Boots", Category::Health),
        ("Holland & Barrett", Category::Health),
    ]
    .into_iter()
    .collect()
}

fn default_weights() -> MerchantWeights {
    let table = [
        ("Tesco", 14.0),
        ("M&S", 8.0),
        ("Starbucks", 12.0),
        ("Pizza Hut", 6.0),
        ("Uber", 8.0),
        ("Shell", 6.0),
        ("Vue Cinema", 5.0),
        ("Arcade", 3.0),
        ("H&M", 6.0),
        ("Costco", 4.0),
        ("Amazon", 12.0),
        ("IKEA", 4.0),
        ("Boots", 7.0),
        ("Holland & Barrett", 5.0),
    ]
    .into_iter()
    .map(|(m, w)| (m.to_string(), w))
    .collect();
    MerchantWeights::Table(table)
}

fn default_seasonal() -> Vec<SeasonalRule> {
    vec![
        SeasonalRule {
            name: "summer-travel".to_string(),
            months: vec![7, 8],
            merchants: MerchantCatalog::new()
                .with("Ryanair", Category::Travel)
                .with("Airbnb", Category::Travel)
                .with("Trainline", Category::Transport),
            weights: HashMap::from([
                ("Ryanair".to_string(), 4.0),
                ("Airbnb".to_string(), 3.0),
                ("Trainline".to_string(), 3.0),
            ]),
        },
        SeasonalRule {
            name: "holiday-shopping".to_string(),
            months: vec![12],
            merchants: MerchantCatalog::new()
                .with("Hamleys", Category::Shopping)
                .with("John Lewis", Category::Shopping),
            weights: HashMap::from([
                ("Hamleys".to_string(), 5.0),
                ("John Lewis".to_string(), 6.0),
                ("Amazon".to_string(), 18.0),
            ]),
        },
    ]
}

fn default_month_rules() -> HashMap<u32, MonthRule> {
    HashMap::from([
        (
            7,
            MonthRule {
                multiplier: 1.0,
                count: Some(CountRange::new(50, 70)),
            },
        ),
        (
            8,
            MonthRule {
                multiplier: 1.0,
                count: Some(CountRange::new(50, 70)),
            },
        ),
        (
            12,
            MonthRule {
                multiplier: 1.25,
                count: Some(CountRange::new(60, 80)),
            },
        ),
    ])
}

fn default_recurring() -> Vec<RecurringCharge> {
    vec![
        RecurringCharge {
            merchant: "Landlord".to_string(),
            category: Category::RentUtilities,
            amount: 950.0,
            day: 1,
            hour: 9,
            minute: 0,
        },
        RecurringCharge {
            merchant: "Vodafone".to_string(),
            category: Category::RentUtilities,
            amount: 45.0,
            day: 1,
            hour: 9,
            minute: 30,
        },
    ]
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A loaded, validated configuration and its source
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GeneratorConfig,
    pub source: ConfigSource,
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendsim").join("config").join("generator.toml"))
}

/// Load configuration (explicit path, then default override location, then embedded)
///
/// An explicit path that does not exist is an error; a missing default
/// override silently falls back to the embedded config.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let (content, source) = if let Some(path) = path {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        (content, ConfigSource::File(path.to_path_buf()))
    } else {
        match default_config_path().filter(|p| p.exists()) {
            Some(default_path) => {
                let content = fs::read_to_string(&default_path).map_err(|e| {
                    Error::Configuration(format!("Failed to read config: {}", e))
                })?;
                (content, ConfigSource::File(default_path))
            }
            None => (DEFAULT_CONFIG.to_string(), ConfigSource::Embedded),
        }
    };

    let config = parse_config(&content)?;
    tracing::debug!(source = %source, merchants = config.catalog.len(), "Loaded generator config");
    Ok(LoadedConfig { config, source })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    generator: Option<RawGenerator>,
    merchants: Option<BTreeMap<String, String>>,
    weights: Option<HashMap<String, f64>>,
    amounts: Option<HashMap<String, AmountRange>>,
    seasonal: Option<Vec<RawSeasonal>>,
    months: Option<Vec<RawMonth>>,
    recurring: Option<Vec<RawRecurring>>,
}

#[derive(Debug, Deserialize)]
struct RawGenerator {
    year: Option<i32>,
    seed_policy: Option<String>,
    default_count: Option<CountRange>,
    weekend_surcharge: Option<f64>,
    weekend_categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawSeasonal {
    name: Option<String>,
    months: Vec<u32>,
    #[serde(default)]
    merchants: BTreeMap<String, String>,
    #[serde(default)]
    weights: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RawMonth {
    month: u32,
    multiplier: Option<f64>,
    count: Option<CountRange>,
}

#[derive(Debug, Deserialize)]
struct RawRecurring {
    merchant: String,
    category: String,
    amount: f64,
    day: u32,
    #[serde(default)]
    hour: u32,
    #[serde(default)]
    minute: u32,
}

fn parse_catalog(raw: BTreeMap<String, String>) -> MerchantCatalog {
    raw.into_iter()
        .map(|(merchant, category)| (merchant, Category::from(category)))
        .collect()
}

/// Parse config from TOML content and validate it
pub fn parse_config(content: &str) -> Result<GeneratorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Configuration(format!("Invalid config TOML: {}", e)))?;

    let mut config = GeneratorConfig::default();

    // Apply generator settings
    if let Some(generator) = raw.generator {
        if let Some(year) = generator.year {
            config.year = Some(year);
        }
        if let Some(policy) = generator.seed_policy {
            config.seed_policy = policy.parse().map_err(Error::Configuration)?;
        }
        if let Some(count) = generator.default_count {
            config.default_count = count;
        }
        if let Some(surcharge) = generator.weekend_surcharge {
            config.weekend_surcharge = surcharge;
        }
        if let Some(categories) = generator.weekend_categories {
            config.weekend_categories = categories.into_iter().map(Category::from).collect();
        }
    }

    // A replaced catalog without weights samples uniformly
    let merchants_replaced = raw.merchants.is_some();
    if let Some(merchants) = raw.merchants {
        config.catalog = parse_catalog(merchants);
    }
    match raw.weights {
        Some(weights) => config.weights = MerchantWeights::Table(weights),
        None if merchants_replaced => config.weights = MerchantWeights::Uniform,
        None => {}
    }

    // Amount ranges merge per category; "default" sets the fallback
    if let Some(amounts) = raw.amounts {
        for (name, range) in amounts {
            if name.eq_ignore_ascii_case("default") {
                config.amount_ranges.fallback = range;
            } else {
                config.amount_ranges.ranges.insert(Category::from(name), range);
            }
        }
    }

    if let Some(seasonal) = raw.seasonal {
        config.seasonal = seasonal
            .into_iter()
            .enumerate()
            .map(|(i, rule)| SeasonalRule {
                name: rule.name.unwrap_or_else(|| format!("seasonal-{}", i + 1)),
                months: rule.months,
                merchants: parse_catalog(rule.merchants),
                weights: rule.weights,
            })
            .collect();
    }

    // Month rules merge per month
    if let Some(months) = raw.months {
        for month in months {
            let rule = config.month_rules.entry(month.month).or_default();
            if let Some(multiplier) = month.multiplier {
                rule.multiplier = multiplier;
            }
            if let Some(count) = month.count {
                rule.count = Some(count);
            }
        }
    }

    if let Some(recurring) = raw.recurring {
        config.recurring = recurring
            .into_iter()
            .map(|r| RecurringCharge {
                merchant: r.merchant,
                category: Category::from(r.category),
                amount: r.amount,
                day: r.day,
                hour: r.hour,
                minute: r.minute,
            })
            .collect();
    }

    config.validate()?;
    Ok(config)
}

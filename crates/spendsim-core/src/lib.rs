//! Spendsim Core Library
//!
//! Shared functionality for the spendsim synthetic spending tool:
//! - Seeded, reproducible transaction generation for one calendar month
//! - Merchant catalog, weights and amount ranges
//! - Layered TOML configuration (embedded default, user override)
//! - Spending reports (category totals, top merchants, daily totals)
//! - Spending digest and prompt library for AI summaries
//! - Pluggable AI backends (OpenAI-compatible, mock)
//! - CSV and JSON export

pub mod ai;
pub mod catalog;
pub mod config;
pub mod digest;
pub mod error;
pub mod export;
pub mod generator;
pub mod models;
pub mod prompts;
pub mod reports;

/// Test utilities including a mock OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, OpenAICompatibleBackend};
pub use catalog::{AmountRange, AmountRanges, MerchantCatalog, MerchantWeights};
pub use config::{
    load_config, parse_config, ConfigSource, GeneratorConfig, LoadedConfig, RecurringCharge,
    SeedPolicy,
};
pub use digest::SpendingDigest;
pub use error::{Error, Result};
pub use export::{write_transactions_csv, write_transactions_json, ExportFormat};
pub use generator::{GenerateRequest, TransactionGenerator};
pub use models::{
    Category, CategoryTotal, DailyTotal, MerchantSummary, SpendingOverview, Transaction,
};
pub use prompts::{Prompt, PromptId, PromptLibrary};

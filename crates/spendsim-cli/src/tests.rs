//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use clap::Parser;
use spendsim_core::ai::{AIClient, MockBackend};

use crate::cli::{Cli, Commands, GenerateArgs, ReportType};
use crate::commands::{self, truncate};

fn args(month: u32, count: Option<u32>) -> GenerateArgs {
    GenerateArgs {
        month,
        seed: 42,
        count,
        year: Some(2024),
    }
}

/// Small valid config: two merchants, no seasonal rules, no recurring bills
fn write_small_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("generator.toml");
    std::fs::write(
        &path,
        r#"
seasonal = []
recurring = []

[generator]
year = 2021

[merchants]
"Corner Shop" = "Groceries"
"Bus Company" = "Transport"
"#,
    )
    .unwrap();
    path
}

// ========== Ledger Tests ==========

#[test]
fn test_generate_ledger_sorted_and_sized() {
    let ledger = commands::generate_ledger(None, &args(9, Some(12))).unwrap();
    assert_eq!(ledger.year, 2024);
    assert_eq!(ledger.period(), "September 2024");
    // 12 sampled plus the two default recurring bills
    assert_eq!(ledger.transactions.len(), 14);
    assert!(ledger
        .transactions
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_generate_ledger_is_deterministic() {
    let a = commands::generate_ledger(None, &args(3, Some(20))).unwrap();
    let b = commands::generate_ledger(None, &args(3, Some(20))).unwrap();
    assert_eq!(a.transactions, b.transactions);
}

#[test]
fn test_generate_ledger_invalid_month() {
    let err = commands::generate_ledger(None, &args(13, Some(5))).unwrap_err();
    assert!(format!("{:#}", err).contains("month"));
}

#[test]
fn test_generate_ledger_zero_count() {
    assert!(commands::generate_ledger(None, &args(9, Some(0))).is_err());
}

#[test]
fn test_generate_ledger_with_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_small_config(dir.path());

    let mut request = args(6, Some(10));
    request.year = None;
    let ledger = commands::generate_ledger(Some(&path), &request).unwrap();

    assert_eq!(ledger.year, 2021);
    assert_eq!(ledger.transactions.len(), 10);
    for tx in &ledger.transactions {
        assert!(tx.merchant == "Corner Shop" || tx.merchant == "Bus Company");
        assert_eq!(tx.timestamp.year(), 2021);
    }
}

#[test]
fn test_open_generator_pins_year() {
    let generator = commands::open_generator(None, None).unwrap();
    assert!(generator.config().year.is_some());

    let generator = commands::open_generator(None, Some(2019)).unwrap();
    assert_eq!(generator.config().year, Some(2019));
}

#[test]
fn test_ledger_year_matches_timestamps_without_year() {
    let mut request = args(1, Some(10));
    request.year = None;
    let ledger = commands::generate_ledger(None, &request).unwrap();

    assert!(ledger
        .transactions
        .iter()
        .all(|tx| tx.timestamp.year() == ledger.year));
}

#[test]
fn test_year_flag_overrides_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_small_config(dir.path());

    let ledger = commands::generate_ledger(Some(&path), &args(6, Some(5))).unwrap();
    assert_eq!(ledger.year, 2024);
}

#[test]
fn test_missing_config_file_is_error() {
    let missing = Path::new("/nonexistent/spendsim.toml");
    let result = commands::generate_ledger(Some(missing), &args(9, Some(5)));
    assert!(result.is_err());
}

// ========== Command Tests ==========

#[test]
fn test_cmd_generate() {
    assert!(commands::cmd_generate(None, &args(9, Some(10)), "£", false).is_ok());
    assert!(commands::cmd_generate(None, &args(9, Some(10)), "$", true).is_ok());
}

#[test]
fn test_cmd_reports() {
    let a = args(12, Some(30));
    assert!(commands::cmd_report_categories(None, &a, "£", false).is_ok());
    assert!(commands::cmd_report_merchants(None, &a, 3, "£", false).is_ok());
    assert!(commands::cmd_report_merchants(None, &a, 0, "£", true).is_ok());
    assert!(commands::cmd_report_daily(None, &a, "£", false).is_ok());
    assert!(commands::cmd_report_overview(None, &a, "£", true).is_ok());
}

#[test]
fn test_cmd_report_invalid_month() {
    assert!(commands::cmd_report_categories(None, &args(0, Some(5)), "£", false).is_err());
}

#[test]
fn test_cmd_export_csv() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("ledger.csv");

    commands::cmd_export(None, &args(9, Some(8)), &file).unwrap();

    let content = std::fs::read_to_string(&file).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("date,category,amount,merchant"));
    assert_eq!(lines.count(), 10);
}

#[test]
fn test_cmd_export_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("ledger.json");

    commands::cmd_export(None, &args(9, Some(8)), &file).unwrap();

    let content = std::fs::read_to_string(&file).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_cmd_config() {
    assert!(commands::cmd_config(None, false, "£").await.is_ok());
    assert!(commands::cmd_config(None, true, "£").await.is_ok());

    let missing = Path::new("/nonexistent/spendsim.toml");
    assert!(commands::cmd_config(Some(missing), false, "£").await.is_err());
}

#[tokio::test]
async fn test_cmd_config_seasonal_only_catalog() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("generator.toml");
    std::fs::write(
        &path,
        r#"
recurring = []

[merchants]

[[seasonal]]
name = "summer-only"
months = [7]
merchants = { "Ryanair" = "Travel" }
"#,
    )
    .unwrap();

    let ledger = commands::generate_ledger(Some(&path), &args(7, Some(5))).unwrap();
    assert!(ledger.transactions.iter().all(|tx| tx.merchant == "Ryanair"));
    assert!(commands::cmd_config(Some(&path), false, "£").await.is_ok());
}

#[tokio::test]
async fn test_cmd_config_zero_base_weights() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("generator.toml");
    std::fs::write(
        &path,
        r#"
recurring = []

[merchants]
"Tesco" = "Groceries"

[weights]
"Tesco" = 0.0

[[seasonal]]
name = "summer-only"
months = [7]
merchants = { "Ryanair" = "Travel" }
weights = { "Ryanair" = 1.0 }
"#,
    )
    .unwrap();

    let ledger = commands::generate_ledger(Some(&path), &args(7, Some(5))).unwrap();
    assert!(ledger.transactions.iter().all(|tx| tx.merchant == "Ryanair"));
    assert!(commands::cmd_config(Some(&path), false, "£").await.is_ok());
}

#[tokio::test]
async fn test_backend_status() {
    let status = commands::backend_status(None).await;
    assert!(status.contains("not configured"));

    let status = commands::backend_status(Some(&AIClient::mock())).await;
    assert!(status.starts_with("mock at mock://localhost"));
    assert!(status.contains("connected"));

    let down = AIClient::Mock(MockBackend::failing());
    assert!(commands::backend_status(Some(&down)).await.contains("unreachable"));
}

// ========== Summary Tests ==========

#[tokio::test]
async fn test_summarize_with_mock_backend() {
    let ledger = commands::generate_ledger(None, &args(9, Some(30))).unwrap();
    let digest = commands::sample_digest(&ledger, 20);
    assert_eq!(digest.transaction_count, 20);

    let client = AIClient::mock();
    let summary = commands::summarize_digest(&digest, "£", Some(&client)).await;
    assert_eq!(
        summary.source,
        commands::SummarySource::Ai {
            model: "mock".to_string()
        }
    );
    assert!(summary.text.contains("September 2024"));
}

#[tokio::test]
async fn test_summarize_without_backend_uses_digest() {
    let ledger = commands::generate_ledger(None, &args(9, Some(30))).unwrap();
    let digest = commands::sample_digest(&ledger, 20);

    let summary = commands::summarize_digest(&digest, "£", None).await;
    assert_eq!(summary.source, commands::SummarySource::Digest);
    assert!(summary.text.starts_with("Over the past 20 transactions"));
}

#[tokio::test]
async fn test_summarize_failing_backend_falls_back() {
    let ledger = commands::generate_ledger(None, &args(9, Some(30))).unwrap();
    let digest = commands::sample_digest(&ledger, 20);

    let client = AIClient::Mock(MockBackend::failing());
    let summary = commands::summarize_digest(&digest, "£", Some(&client)).await;
    assert_eq!(summary.source, commands::SummarySource::Digest);
    assert_eq!(summary.text, digest.to_text("£"));
}

#[test]
fn test_sample_larger_than_ledger() {
    let ledger = commands::generate_ledger(None, &args(9, Some(5))).unwrap();
    let digest = commands::sample_digest(&ledger, 100);
    assert_eq!(digest.transaction_count, ledger.transactions.len());
}

// ========== Formatting Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello world", 8), "hello...");
    assert_eq!(truncate("Holland & Barrett", 10), "Holland...");
    // Multi-byte characters are counted, not sliced
    assert_eq!(truncate("£££££", 4), "£...");
}

#[test]
fn test_format_amount_and_timestamp() {
    assert_eq!(commands::format_amount("£", 12.5), "£12.50");
    assert_eq!(commands::format_amount("$", 950.0), "$950.00");

    let ts = NaiveDate::from_ymd_opt(2024, 9, 7)
        .unwrap()
        .and_hms_opt(8, 5, 0)
        .unwrap();
    assert_eq!(commands::format_timestamp(&ts), "07/09/2024 08:05");
}

#[test]
fn test_bar() {
    assert_eq!(commands::bar(0.0, 100.0), "");
    assert_eq!(commands::bar(100.0, 100.0).chars().count(), 30);
    assert_eq!(commands::bar(1.0, 1000.0).chars().count(), 1);
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_generate_args() {
    let cli = Cli::try_parse_from([
        "spendsim", "generate", "--month", "9", "--seed", "7", "-n", "15", "--json",
    ])
    .unwrap();
    assert_eq!(cli.currency, "£");
    match cli.command {
        Commands::Generate { args, json } => {
            assert_eq!(args.month, 9);
            assert_eq!(args.seed, 7);
            assert_eq!(args.count, Some(15));
            assert!(json);
        }
        _ => panic!("Expected generate command"),
    }
}

#[test]
fn test_parse_report_merchants_defaults() {
    let cli = Cli::try_parse_from([
        "spendsim",
        "--currency",
        "€",
        "report",
        "merchants",
        "--month",
        "12",
    ])
    .unwrap();
    assert_eq!(cli.currency, "€");
    match cli.command {
        Commands::Report {
            report_type: ReportType::Merchants { args, limit, json },
        } => {
            assert_eq!(args.month, 12);
            assert_eq!(args.seed, 42);
            assert_eq!(limit, 3);
            assert!(!json);
        }
        _ => panic!("Expected report merchants command"),
    }
}

#[test]
fn test_parse_requires_month() {
    assert!(Cli::try_parse_from(["spendsim", "generate"]).is_err());
    assert!(Cli::try_parse_from(["spendsim", "summarize", "--month", "x"]).is_err());
}

#[test]
fn test_parse_summarize_sample_default() {
    let cli = Cli::try_parse_from(["spendsim", "summarize", "-m", "4", "--verbose"]).unwrap();
    assert!(cli.verbose);
    match cli.command {
        Commands::Summarize {
            args,
            sample,
            model,
        } => {
            assert_eq!(args.month, 4);
            assert_eq!(sample, 20);
            assert!(model.is_none());
        }
        _ => panic!("Expected summarize command"),
    }
}

#[test]
fn test_parse_summarize_model_override() {
    let cli =
        Cli::try_parse_from(["spendsim", "summarize", "-m", "4", "--model", "llama3.2"]).unwrap();
    match cli.command {
        Commands::Summarize { model, .. } => assert_eq!(model.as_deref(), Some("llama3.2")),
        _ => panic!("Expected summarize command"),
    }
}

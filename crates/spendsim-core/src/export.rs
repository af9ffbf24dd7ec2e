//! Ledger export
//!
//! Supports:
//! - CSV with a fixed `date,category,amount,merchant` header
//! - Pretty-printed JSON array of transactions

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::Transaction;

/// Header row of every CSV export
pub const CSV_HEADER: [&str; 4] = ["date", "category", "amount", "merchant"];

const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension; anything but `.json` is CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Write transactions as CSV, one row per transaction in the given order
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for tx in transactions {
        wtr.write_record([
            tx.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string(),
            tx.category.to_string(),
            format!("{:.2}", tx.amount),
            tx.merchant.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write transactions as a JSON array
pub fn write_transactions_json<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    serde_json::to_writer_pretty(writer, transactions)?;
    Ok(())
}

/// Export to a file, choosing the format from its extension
///
/// Returns the format used.
pub fn export_to_path(path: &Path, transactions: &[Transaction]) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        ExportFormat::Csv => write_transactions_csv(&mut writer, transactions)?,
        ExportFormat::Json => write_transactions_json(&mut writer, transactions)?,
    }
    writer.flush()?;

    tracing::info!(
        path = %path.display(),
        count = transactions.len(),
        ?format,
        "Exported transactions"
    );
    Ok(format)
}

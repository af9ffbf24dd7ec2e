//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendsim_core::export::export_to_path;

use super::generate_ledger;
use crate::cli::GenerateArgs;

pub fn cmd_export(config_path: Option<&Path>, args: &GenerateArgs, file: &Path) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;

    let format = export_to_path(file, &ledger.transactions)
        .with_context(|| format!("Failed to export to {}", file.display()))?;

    println!(
        "✅ Exported {} transactions for {} to {} ({:?})",
        ledger.transactions.len(),
        ledger.period(),
        file.display(),
        format
    );

    Ok(())
}

//! AI summary command implementation

use std::path::Path;

use anyhow::Result;
use spendsim_core::ai::{AIBackend, AIClient};
use spendsim_core::SpendingDigest;
use tracing::{info, warn};

use super::{generate_ledger, Ledger};
use crate::cli::GenerateArgs;

/// Where a printed summary came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySource {
    /// Written by the AI backend running `model`
    Ai { model: String },
    /// Plain digest; no backend, or the backend failed
    Digest,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// Digest of the `sample` earliest transactions in the ledger
pub fn sample_digest(ledger: &Ledger, sample: usize) -> SpendingDigest {
    let end = sample.min(ledger.transactions.len());
    SpendingDigest::from_transactions(&ledger.transactions[..end])
        .with_period(ledger.month, ledger.year)
}

/// Ask `client` for a summary, falling back to the digest text
pub async fn summarize_digest(
    digest: &SpendingDigest,
    currency: &str,
    client: Option<&AIClient>,
) -> Summary {
    let fallback = || Summary {
        text: digest.to_text(currency),
        source: SummarySource::Digest,
    };

    let Some(client) = client else {
        return fallback();
    };
    if digest.is_empty() {
        return fallback();
    }

    match client.summarize_spending(digest, currency).await {
        Ok(text) => Summary {
            text,
            source: SummarySource::Ai {
                model: client.model().to_string(),
            },
        },
        Err(e) => {
            warn!(error = %e, host = client.host(), "AI summary failed, showing digest instead");
            fallback()
        }
    }
}

pub async fn cmd_summarize(
    config_path: Option<&Path>,
    args: &GenerateArgs,
    currency: &str,
    sample: usize,
    model: Option<&str>,
) -> Result<()> {
    let ledger = generate_ledger(config_path, args)?;
    let digest = sample_digest(&ledger, sample);

    let client = AIClient::from_env().map(|client| match model {
        Some(model) => client.with_model(model),
        None => client,
    });
    if client.is_none() {
        info!("No AI backend configured (set OPENAI_COMPATIBLE_API_KEY to enable summaries)");
    }

    let summary = summarize_digest(&digest, currency, client.as_ref()).await;

    println!();
    println!(
        "📝 Spending Summary: {} ({} of {} transactions)",
        ledger.period(),
        digest.transaction_count,
        ledger.transactions.len()
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!();
    for line in summary.text.lines() {
        println!("   {}", line);
    }
    println!();
    match summary.source {
        SummarySource::Ai { model } => println!("   🤖 Written by {}", model),
        SummarySource::Digest => println!("   ℹ️  Plain digest (no AI summary)"),
    }
    println!();

    Ok(())
}

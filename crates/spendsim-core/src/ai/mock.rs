//! Mock backend for testing
//!
//! Produces a deterministic summary straight from the digest, without a
//! running LLM server.

use async_trait::async_trait;

use crate::digest::SpendingDigest;
use crate::error::{Error, Result};

use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Fail every summarize call (exercises fallback paths)
    pub failing: bool,
}

impl MockBackend {
    /// Healthy mock backend
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Backend whose summaries always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }

    /// No-op for mock
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn summarize_spending(&self, digest: &SpendingDigest, currency: &str) -> Result<String> {
        if self.failing {
            return Err(Error::InvalidData("Mock backend configured to fail".into()));
        }

        if digest.is_empty() {
            return Ok("You haven't spent anything yet, so there's nothing to report.".into());
        }

        let mut summary = format!(
            "You made {} purchases totalling {}{:.2}",
            digest.transaction_count, currency, digest.total
        );
        if let Some(ref period) = digest.period {
            summary.push_str(&format!(" in {}", period));
        }
        summary.push('.');
        if let Some(top) = digest.top_categories.first() {
            summary.push_str(&format!(
                " Most of it went on {}, so that's the place to look if you want to cut back.",
                top.category
            ));
        }
        Ok(summary)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

//! Pluggable AI summarization backend
//!
//! # Architecture
//!
//! - `AIBackend` trait: the interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let digest = SpendingDigest::from_transactions(&ledger);
//! if let Some(client) = AIClient::from_env() {
//!     let summary = client.summarize_spending(&digest, "£").await?;
//!     println!("{}", summary);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai_compatible, mock). Default: openai_compatible
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (default: https://api.openai.com)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key, sent as a bearer token

mod mock;
mod openai_compatible;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::digest::SpendingDigest;
use crate::error::Result;

/// Interface shared by all AI backends
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Turn a spending digest into a short conversational summary
    async fn summarize_spending(&self, digest: &SpendingDigest, currency: &str) -> Result<String>;

    /// Whether the backend is reachable
    async fn health_check(&self) -> bool;

    fn model(&self) -> &str;

    fn host(&self) -> &str;
}

/// Concrete AI client wrapping one of the backends
#[derive(Clone)]
pub enum AIClient {
    OpenAICompatible(OpenAICompatibleBackend),
    Mock(MockBackend),
}

impl AIClient {
    /// Build a client from environment variables
    ///
    /// Returns `None` when the selected backend is not configured.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai_compatible".to_string());

        match backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(
                    backend = %backend,
                    "Unknown AI_BACKEND, falling back to openai_compatible"
                );
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
        }
    }

    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Same backend, different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn summarize_spending(&self, digest: &SpendingDigest, currency: &str) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.summarize_spending(digest, currency).await,
            AIClient::Mock(b) => b.summarize_spending(digest, currency).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

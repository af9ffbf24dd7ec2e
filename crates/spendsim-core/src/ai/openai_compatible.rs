//! OpenAI-compatible backend implementation
//!
//! Works with the hosted OpenAI API and any server implementing the
//! `/v1/chat/completions` endpoint (vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (default: https://api.openai.com)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key, sent as a bearer token

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::digest::SpendingDigest;
use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

use super::AIBackend;

pub const DEFAULT_HOST: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for summaries
const SUMMARY_TEMPERATURE: f32 = 0.7;
const SUMMARY_MAX_TOKENS: u32 = 200;

/// OpenAI-compatible backend
///
/// ```rust,ignore
/// // Hosted OpenAI
/// export OPENAI_COMPATIBLE_API_KEY="sk-..."
///
/// // Local vLLM
/// export OPENAI_COMPATIBLE_HOST="http://192.168.1.100:8000"
/// export OPENAI_COMPATIBLE_MODEL="meta-llama/Llama-3.2-3B-Instruct"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Same connection, different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Use a specific prompt library instead of the default one
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Returns `None` when neither an API key nor an explicit host is set.
    pub fn from_env() -> Option<Self> {
        Self::from_settings(
            std::env::var("OPENAI_COMPATIBLE_HOST").ok(),
            std::env::var("OPENAI_COMPATIBLE_MODEL").ok(),
            std::env::var("OPENAI_COMPATIBLE_API_KEY").ok(),
        )
    }

    fn from_settings(
        host: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
    ) -> Option<Self> {
        let host = host.filter(|h| !h.trim().is_empty());
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if host.is_none() && api_key.is_none() {
            return None;
        }

        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let mut backend = Self::new(host.as_deref().unwrap_or(DEFAULT_HOST), &model);
        backend.api_key = api_key;
        Some(backend)
    }

    /// Render the (system, user) message pair for a digest
    fn render_summary_prompt(
        &self,
        digest: &SpendingDigest,
        currency: &str,
    ) -> Result<(String, String)> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(PromptId::SpendingSummary)?;

        let owned = digest.template_vars(currency);
        let vars: HashMap<&str, &str> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let system = template.system_section().unwrap_or_default().to_string();
        Ok((system, template.render_user(&vars)))
    }

    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage::new("system", system));
        }
        messages.push(ChatMessage::new("user", user));

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(SUMMARY_TEMPERATURE),
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn summarize_spending(&self, digest: &SpendingDigest, currency: &str) -> Result<String> {
        let (system, user) = self.render_summary_prompt(digest, currency)?;
        debug!(model = %self.model, host = %self.base_url, "Requesting spending summary");

        let summary = self.chat_completion(&system, &user).await?;
        debug!("OpenAI-compatible summary response: {}", summary);
        Ok(summary)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

//! One-word answers to free-text questions.

use crate::config::ProviderConfig;
use crate::services::providers::{
    check_primary_key, gemini, openrouter, ProviderError, ProviderSelection,
};
use metrics::histogram;
use reqwest::Client;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;

const ONE_WORD_INSTRUCTION: &str =
    "Answer the following question with exactly ONE word only. No explanation. Question: ";

pub fn build_prompt(question: &str) -> String {
    format!("{}{}", ONE_WORD_INSTRUCTION, question)
}

/// First whitespace-separated token of `raw`, keeping only `[A-Za-z0-9_-]`.
///
/// The result may be empty.
pub fn normalize_answer(raw: &str) -> String {
    raw.split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Routes questions to whichever provider is configured.
///
/// Holds only immutable configuration and a pooled HTTP client, so clones
/// are cheap and share nothing mutable.
#[derive(Clone)]
pub struct AnswerResolver {
    client: Client,
    config: Arc<ProviderConfig>,
}

impl AnswerResolver {
    pub fn new(config: Arc<ProviderConfig>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Answer `question` with a single normalized word.
    pub async fn resolve(&self, question: &str) -> Result<String, ProviderError> {
        let selection = ProviderSelection::select(&self.config);
        let prompt = build_prompt(question);
        let started = Instant::now();

        let result = match selection {
            ProviderSelection::Primary(key) => self.ask_openrouter(key, &prompt).await,
            ProviderSelection::Secondary(key) => self.ask_gemini(key, &prompt).await,
            ProviderSelection::None => Err(ProviderError::NotConfigured),
        };

        histogram!(
            "bfhl_provider_latency_seconds",
            "provider" => selection.name(),
            "outcome" => if result.is_ok() { "success" } else { "error" }
        )
        .record(started.elapsed().as_secs_f64());

        let raw = result?;
        Ok(normalize_answer(&raw))
    }

    async fn ask_openrouter(&self, api_key: &str, prompt: &str) -> Result<String, ProviderError> {
        check_primary_key(api_key)?;
        openrouter::complete(&self.client, &self.config, api_key, prompt).await
    }

    /// Discover, choose, query. The listing always completes before the query
    /// is sent.
    async fn ask_gemini(&self, api_key: &str, prompt: &str) -> Result<String, ProviderError> {
        let base_url = &self.config.gemini_base_url;

        let catalog = gemini::list_models(&self.client, base_url, api_key).await;
        if let Some(cause) = catalog.cause() {
            tracing::warn!(cause = %cause, "Gemini model listing failed");
        }

        let model = gemini::choose_model(&catalog)?;
        tracing::debug!(model = %model, "Selected Gemini model");

        gemini::generate(&self.client, base_url, api_key, model, prompt).await
    }
}

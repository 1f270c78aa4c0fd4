//! OpenRouter provider: one OpenAI-style chat completion per question.

use super::ProviderError;
use crate::config::ProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Send `prompt` as a single user message and return the first choice's text,
/// trimmed.
pub async fn complete(
    client: &Client,
    config: &ProviderConfig,
    api_key: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let url = format!(
        "{}/chat/completions",
        config.openrouter_base_url.trim_end_matches('/')
    );

    let request = ChatCompletionRequest {
        model: &config.openrouter_model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        max_tokens: config.openrouter_max_tokens,
    };

    tracing::debug!(
        model = %config.openrouter_model,
        prompt_len = prompt.len(),
        "Sending request to OpenRouter"
    );

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        return Err(ProviderError::ApiError(if error_text.trim().is_empty() {
            format!("OpenRouter {}", status.as_u16())
        } else {
            error_text
        }));
    }

    let body: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

// ============================================================================
// OpenRouter API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

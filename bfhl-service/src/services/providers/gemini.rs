//! Gemini provider.
//!
//! Which models a key may call varies per key, so every question runs three
//! steps: list the key's models, pick one, then generate with it.

use super::ProviderError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Known-good models, most preferred first.
pub const PREFERRED_MODELS: [&str; 4] = [
    "models/gemini-1.5-flash",
    "models/gemini-1.5",
    "models/gemini-1.0",
    "models/text-bison-001",
];

/// Outcome of the model-listing call.
///
/// Listing is best effort: a failure is kept as data so the choose step can
/// report it alongside "no model available".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFetch {
    Listed(Vec<String>),
    Failed { cause: String },
}

impl CatalogFetch {
    pub fn models(&self) -> &[String] {
        match self {
            CatalogFetch::Listed(models) => models,
            CatalogFetch::Failed { .. } => &[],
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            CatalogFetch::Listed(_) => None,
            CatalogFetch::Failed { cause } => Some(cause),
        }
    }
}

/// Fetch the model names this key can use. Never fails.
pub async fn list_models(client: &Client, base_url: &str, api_key: &str) -> CatalogFetch {
    let url = format!("{}/models", base_url.trim_end_matches('/'));

    let response = match client.get(&url).query(&[("key", api_key)]).send().await {
        Ok(response) => response,
        Err(e) => {
            return CatalogFetch::Failed {
                cause: e.without_url().to_string(),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return CatalogFetch::Failed {
            cause: format!("HTTP {}", status),
        };
    }

    match response.json::<ListModelsResponse>().await {
        Ok(body) => CatalogFetch::Listed(
            body.models
                .into_iter()
                .filter_map(|m| m.name)
                .filter(|name| !name.is_empty())
                .collect(),
        ),
        Err(e) => CatalogFetch::Failed {
            cause: format!("Failed to parse model list: {}", e.without_url()),
        },
    }
}

/// First preferred model the key can use, else the first model listed.
pub fn choose_model(catalog: &CatalogFetch) -> Result<&str, ProviderError> {
    let models = catalog.models();

    models
        .iter()
        .find(|m| PREFERRED_MODELS.contains(&m.as_str()))
        .or_else(|| models.first())
        .map(String::as_str)
        .ok_or_else(|| ProviderError::NoModelAvailable {
            models: models.to_vec(),
            cause: catalog.cause().map(str::to_string),
        })
}

/// Generate a reply to `prompt` with `model` and return its first text part,
/// trimmed.
pub async fn generate(
    client: &Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let model_path = if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    };
    let url = format!(
        "{}/{}:generateContent",
        base_url.trim_end_matches('/'),
        model_path
    );

    let request = GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![ContentPart {
                text: Some(prompt.to_string()),
            }],
        }],
    };

    tracing::debug!(
        model = %model,
        prompt_len = prompt.len(),
        "Sending request to Gemini API"
    );

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request)
        .send()
        .await
        .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        return Err(ProviderError::ApiError(format!(
            "Gemini API error {}: {}",
            status, error_text
        )));
    }

    let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
        ProviderError::ApiError(format!("Failed to parse response: {}", e.without_url()))
    })?;

    api_response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(names: &[&str]) -> CatalogFetch {
        CatalogFetch::Listed(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_choose_prefers_known_models_in_catalog_order() {
        let catalog = listed(&[
            "models/embedding-001",
            "models/gemini-1.0",
            "models/gemini-1.5-flash",
        ]);
        // Catalog order decides among preferred entries.
        assert_eq!(choose_model(&catalog).unwrap(), "models/gemini-1.0");
    }

    #[test]
    fn test_choose_falls_back_to_first_entry() {
        let catalog = listed(&["models/gemini-2.0-flash", "models/embedding-001"]);
        assert_eq!(choose_model(&catalog).unwrap(), "models/gemini-2.0-flash");
    }

    #[test]
    fn test_choose_empty_catalog_reports_cause() {
        let catalog = CatalogFetch::Failed {
            cause: "connection refused".to_string(),
        };
        match choose_model(&catalog) {
            Err(ProviderError::NoModelAvailable { models, cause }) => {
                assert!(models.is_empty());
                assert_eq!(cause.as_deref(), Some("connection refused"));
            }
            other => panic!("expected NoModelAvailable, got {:?}", other),
        }

        assert!(matches!(
            choose_model(&listed(&[])),
            Err(ProviderError::NoModelAvailable { cause: None, .. })
        ));
    }
}

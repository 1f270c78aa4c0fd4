//! Answer providers.
//!
//! Two text-generation backends with unrelated wire protocols. Which one
//! serves a request is decided once per call by [`ProviderSelection`]; each
//! arm's protocol lives in its own module.

pub mod gemini;
pub mod openrouter;

use crate::config::ProviderConfig;
use thiserror::Error;

/// Google API keys start with this marker. Seeing it in the OpenRouter slot
/// means the keys were swapped.
pub const GOOGLE_KEY_PREFIX: &str = "AIza";

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("no provider configured")]
    NotConfigured,

    #[error("{0}")]
    Misconfigured(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error(
        "no model available for this credential. Available models: {}",
        describe_catalog(.models, .cause.as_deref())
    )]
    NoModelAvailable {
        models: Vec<String>,
        cause: Option<String>,
    },

    #[error("No AI response")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether the failure comes from local configuration rather than the
    /// remote service.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::NotConfigured | ProviderError::Misconfigured(_)
        )
    }
}

fn describe_catalog(models: &[String], cause: Option<&str>) -> String {
    match (models.is_empty(), cause) {
        (false, _) => models.join(", "),
        (true, Some(cause)) => format!("none (model list failed: {})", cause),
        (true, None) => "none (key lacks permissions)".to_string(),
    }
}

/// Which backend answers this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSelection<'a> {
    /// OpenRouter chat completions, keyed by bearer token.
    Primary(&'a str),
    /// Gemini generate-content, keyed by query parameter.
    Secondary(&'a str),
    None,
}

impl<'a> ProviderSelection<'a> {
    /// The primary key wins whenever it is non-blank, even when it later
    /// fails the shape check.
    pub fn select(config: &'a ProviderConfig) -> Self {
        let non_blank = |key: &'a Option<String>| {
            key.as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
        };

        if let Some(key) = non_blank(&config.openrouter_api_key) {
            ProviderSelection::Primary(key)
        } else if let Some(key) = non_blank(&config.gemini_api_key) {
            ProviderSelection::Secondary(key)
        } else {
            ProviderSelection::None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderSelection::Primary(_) => "openrouter",
            ProviderSelection::Secondary(_) => "gemini",
            ProviderSelection::None => "none",
        }
    }
}

/// Reject a primary key that is really a Google key before any network call.
pub fn check_primary_key(key: &str) -> Result<(), ProviderError> {
    if key.starts_with(GOOGLE_KEY_PREFIX) {
        return Err(ProviderError::Misconfigured(format!(
            "OPENROUTER_API_KEY appears to be a Google API key (starts with \"{}\"). \
             Move that key into GEMINI_API_KEY and set OPENROUTER_API_KEY to your OpenRouter key \
             (starts with \"sk-or-\") if you have one",
            GOOGLE_KEY_PREFIX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(primary: Option<&str>, secondary: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            openrouter_api_key: primary.map(str::to_string),
            gemini_api_key: secondary.map(str::to_string),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_primary_takes_precedence() {
        let cfg = config(Some("sk-or-v1-abc"), Some("AIzaXYZ"));
        assert_eq!(
            ProviderSelection::select(&cfg),
            ProviderSelection::Primary("sk-or-v1-abc")
        );
    }

    #[test]
    fn test_blank_primary_falls_through_to_secondary() {
        let cfg = config(Some("   "), Some(" AIzaXYZ "));
        assert_eq!(
            ProviderSelection::select(&cfg),
            ProviderSelection::Secondary("AIzaXYZ")
        );
    }

    #[test]
    fn test_no_keys_selects_none() {
        assert_eq!(
            ProviderSelection::select(&config(None, Some(""))),
            ProviderSelection::None
        );
    }

    #[test]
    fn test_google_key_in_primary_slot_is_rejected() {
        let err = check_primary_key("AIzaSyDUMMY").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(check_primary_key("sk-or-v1-abc").is_ok());
    }

    #[test]
    fn test_no_model_message_lists_catalog_or_cause() {
        let listed = ProviderError::NoModelAvailable {
            models: vec!["models/a".to_string(), "models/b".to_string()],
            cause: None,
        };
        assert!(listed.to_string().ends_with("models/a, models/b"));

        let failed = ProviderError::NoModelAvailable {
            models: Vec::new(),
            cause: Some("HTTP 403 Forbidden".to_string()),
        };
        assert!(failed
            .to_string()
            .ends_with("none (model list failed: HTTP 403 Forbidden)"));
        assert!(!failed.is_configuration());
    }
}

use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_IDENTITY: &str = "operator@example.com";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-3.5-turbo";
const DEFAULT_OPENROUTER_MAX_TOKENS: u32 = 50;
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_AI_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct BfhlConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Operator identity echoed in every response envelope.
    pub identity: String,
    pub providers: ProviderConfig,
}

/// Credentials and endpoints for the answer providers.
///
/// Built once at startup and never mutated; blank keys are stored as `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub openrouter_max_tokens: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// `0` disables the timeout.
    pub request_timeout_secs: u64,
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            openrouter_max_tokens: DEFAULT_OPENROUTER_MAX_TOKENS,
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_AI_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BfhlConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(BfhlConfig {
            common: common_config,
            identity: get_env("OFFICIAL_EMAIL", Some(DEFAULT_IDENTITY), is_prod)?,
            providers: ProviderConfig {
                openrouter_api_key: get_secret("OPENROUTER_API_KEY"),
                openrouter_base_url: get_env(
                    "OPENROUTER_BASE_URL",
                    Some(DEFAULT_OPENROUTER_BASE_URL),
                    false,
                )?,
                openrouter_model: get_env(
                    "OPENROUTER_MODEL",
                    Some(DEFAULT_OPENROUTER_MODEL),
                    false,
                )?,
                openrouter_max_tokens: parse_env(
                    "OPENROUTER_MAX_TOKENS",
                    DEFAULT_OPENROUTER_MAX_TOKENS,
                )?,
                gemini_api_key: get_secret("GEMINI_API_KEY"),
                gemini_base_url: get_env("GEMINI_BASE_URL", Some(DEFAULT_GEMINI_BASE_URL), false)?,
                request_timeout_secs: parse_env(
                    "AI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_AI_REQUEST_TIMEOUT_SECS,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Optional credential; unset and whitespace-only values are both absent.
fn get_secret(key: &str) -> Option<String> {
    normalize_secret(env::var(key).ok())
}

fn normalize_secret(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

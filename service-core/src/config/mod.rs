use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use std::env;

pub const DEFAULT_PORT: u16 = 3000;

/// Request bodies larger than this are rejected before reaching a handler.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024;

/// Settings shared by every service: listener, logging and HTTP surface.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub body_limit_bytes: usize,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    /// Empty means any origin is allowed.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load from `.env`, an optional `configuration` file and `APP__*` variables.
    ///
    /// A plain `PORT` variable is honoured as the default port so hosting
    /// platforms that only set `PORT` work without extra configuration.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let default_port = match env::var("PORT") {
            Ok(port) => port.parse::<u16>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("PORT is not a valid port: {}", e))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let config = Cfg::builder()
            .set_default("port", i64::from(default_port))?
            .set_default("log_level", "info")?
            .set_default("body_limit_bytes", DEFAULT_BODY_LIMIT_BYTES as i64)?
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            otlp_endpoint: None,
            allowed_origins: Vec::new(),
        }
    }
}

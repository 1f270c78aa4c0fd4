#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bfhl_service::config::{BfhlConfig, ProviderConfig};
use bfhl_service::dtos::ResponseEnvelope;
use bfhl_service::startup::{build_router, AppState};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use tower::util::ServiceExt;

pub const TEST_IDENTITY: &str = "tester@example.com";

pub fn test_config(providers: ProviderConfig) -> BfhlConfig {
    BfhlConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        identity: TEST_IDENTITY.to_string(),
        providers,
    }
}

/// Providers with no credentials at all.
pub fn no_providers() -> ProviderConfig {
    ProviderConfig {
        request_timeout_secs: 5,
        ..ProviderConfig::default()
    }
}

pub fn openrouter_at(base_url: &str, api_key: &str) -> ProviderConfig {
    ProviderConfig {
        openrouter_api_key: Some(api_key.to_string()),
        openrouter_base_url: base_url.to_string(),
        ..no_providers()
    }
}

pub fn gemini_at(base_url: &str, api_key: &str) -> ProviderConfig {
    ProviderConfig {
        gemini_api_key: Some(api_key.to_string()),
        gemini_base_url: base_url.to_string(),
        ..no_providers()
    }
}

pub fn router(providers: ProviderConfig) -> Router {
    let state = AppState::new(test_config(providers)).expect("Failed to build app state");
    build_router(state)
}

pub async fn post_raw(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bfhl")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body: Value = serde_json::from_slice(&bytes).expect("Response is not JSON");
    (status, body)
}

pub async fn post_bfhl(app: Router, body: Value) -> (StatusCode, ResponseEnvelope) {
    let (status, json) = post_raw(app, body.to_string()).await;
    let envelope: ResponseEnvelope =
        serde_json::from_value(json).expect("Response is not an envelope");
    (status, envelope)
}

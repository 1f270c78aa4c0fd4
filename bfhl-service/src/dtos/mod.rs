use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;

/// Uniform response body for every dispatch outcome.
///
/// `data` is set exactly when `success` is true, `error` exactly when it is
/// false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(identity: &str, data: Value) -> Self {
        Self {
            success: true,
            identity: identity.to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(identity: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            identity: identity.to_string(),
            data: None,
            error: Some(error.into()),
        }
    }

    /// Render `err` with its status. Server faults are logged here with full
    /// detail; the caller only sees the public message.
    pub fn error_response(identity: &str, err: &AppError) -> Response {
        let status = err.status_code();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = ?err, "Request failed");
        }

        (status, Json(Self::failure(identity, err.public_message()))).into_response()
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub identity: String,
}

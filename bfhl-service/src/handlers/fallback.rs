use crate::dtos::ResponseEnvelope;
use crate::startup::AppState;
use axum::{body::Body, extract::State, response::Response};
use service_core::error::AppError;
use std::any::Any;
use tower_http::catch_panic::ResponseForPanic;

/// Unknown routes and unsupported methods.
pub async fn not_found(State(state): State<AppState>) -> Response {
    ResponseEnvelope::error_response(
        &state.config.identity,
        &AppError::NotFound(anyhow::anyhow!("Not found")),
    )
}

/// Response for a handler that panicked. The payload is logged, never returned.
pub fn panic_response(identity: &str, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    ResponseEnvelope::error_response(
        identity,
        &AppError::InternalError(anyhow::anyhow!("handler panicked: {}", detail)),
    )
}

/// Panic responder for `CatchPanicLayer::custom`.
#[derive(Debug, Clone)]
pub struct PanicEnvelope {
    identity: String,
}

impl PanicEnvelope {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl ResponseForPanic for PanicEnvelope {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        panic_response(&self.identity, err)
    }
}

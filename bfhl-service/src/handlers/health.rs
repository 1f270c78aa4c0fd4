use crate::dtos::HealthResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        identity: state.config.identity.clone(),
    })
}

use crate::dtos::ResponseEnvelope;
use crate::error::DispatchError;
use crate::services::numeric;
use crate::services::validator::{self, Operation};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde_json::Value;
use service_core::error::AppError;

/// `POST /bfhl`: run exactly one operation and wrap the outcome.
pub async fn dispatch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let identity = state.config.identity.as_str();

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            counter!("bfhl_operations_total", "operation" => "none", "outcome" => "rejected_body")
                .increment(1);
            return ResponseEnvelope::error_response(identity, &rejection_error(rejection));
        }
    };

    let (operation, result) = match validator::validate(&body) {
        Ok(op) => (op.name(), execute(&state, op).await),
        Err(err) => ("none", Err(err)),
    };

    match result {
        Ok(data) => {
            counter!("bfhl_operations_total", "operation" => operation, "outcome" => "success")
                .increment(1);
            (StatusCode::OK, Json(ResponseEnvelope::success(identity, data))).into_response()
        }
        Err(err) => {
            counter!("bfhl_operations_total", "operation" => operation, "outcome" => err.kind())
                .increment(1);
            if let DispatchError::ProviderConfig(e) | DispatchError::ProviderUnavailable(e) = &err {
                tracing::warn!(error = %e, "Answer provider failed");
            }
            ResponseEnvelope::error_response(identity, &AppError::from(err))
        }
    }
}

/// Route a validated operation to the numeric kernel or the resolver.
async fn execute(state: &AppState, operation: Operation<'_>) -> Result<Value, DispatchError> {
    match operation {
        Operation::Sequence(n) => compute(move || to_data(numeric::sequence(n))).await,
        Operation::Primality(values) => {
            let values = values.clone();
            compute(move || to_data(numeric::filter_primes(&values))).await
        }
        Operation::Lcm(values) => {
            let values = values.to_vec();
            compute(move || {
                numeric::reduce_lcm(&values)
                    .map_err(|e| DispatchError::from_numeric("lcm", e))
                    .and_then(to_data)
            })
            .await
        }
        Operation::Hcf(values) => {
            let values = values.to_vec();
            compute(move || {
                numeric::reduce_gcd(&values)
                    .map(Value::from)
                    .map_err(|e| DispatchError::from_numeric("hcf", e))
            })
            .await
        }
        Operation::Ask(question) => Ok(Value::String(state.resolver.resolve(question).await?)),
    }
}

/// Trial division on large inputs takes long enough to stall an async
/// worker, so numeric work runs on the blocking pool.
async fn compute<F>(work: F) -> Result<Value, DispatchError>
where
    F: FnOnce() -> Result<Value, DispatchError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DispatchError::Internal(anyhow::anyhow!("numeric task failed: {}", e)))?
}

fn to_data<T: serde::Serialize>(value: T) -> Result<Value, DispatchError> {
    serde_json::to_value(value).map_err(|e| DispatchError::Internal(e.into()))
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".to_string())
    } else {
        AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", rejection.body_text()))
    }
}

use crate::services::numeric::NumericError;
use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

/// Everything that can stop a dispatch, by who is at fault.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Missing, conflicting or malformed operation input.
    #[error("{0}")]
    Validation(String),

    /// Input was well-formed but left nothing to compute with.
    #[error("{0}")]
    ComputationGap(String),

    #[error(transparent)]
    ProviderConfig(ProviderError),

    #[error(transparent)]
    ProviderUnavailable(ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DispatchError {
    /// Metrics label for the outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Validation(_) => "validation_error",
            DispatchError::ComputationGap(_) => "computation_gap",
            DispatchError::ProviderConfig(_) => "provider_config_error",
            DispatchError::ProviderUnavailable(_) => "provider_unavailable",
            DispatchError::Internal(_) => "internal_error",
        }
    }

    pub(crate) fn from_numeric(operation: &str, err: NumericError) -> Self {
        match err {
            NumericError::NoValidOperands => {
                DispatchError::ComputationGap(format!("{} array must contain valid integers", operation))
            }
            NumericError::Overflow => DispatchError::ComputationGap(format!("{} {}", operation, err)),
        }
    }
}

impl From<ProviderError> for DispatchError {
    fn from(err: ProviderError) -> Self {
        if err.is_configuration() {
            DispatchError::ProviderConfig(err)
        } else {
            DispatchError::ProviderUnavailable(err)
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Validation(msg) | DispatchError::ComputationGap(msg) => {
                AppError::BadRequest(anyhow::anyhow!(msg))
            }
            DispatchError::ProviderConfig(e) | DispatchError::ProviderUnavailable(e) => {
                AppError::ServiceUnavailable(format!(
                    "AI service unavailable: {}. Check OPENROUTER_API_KEY or GEMINI_API_KEY.",
                    e
                ))
            }
            DispatchError::Internal(e) => AppError::InternalError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_provider_errors_are_classified() {
        assert!(matches!(
            DispatchError::from(ProviderError::NotConfigured),
            DispatchError::ProviderConfig(_)
        ));
        assert!(matches!(
            DispatchError::from(ProviderError::EmptyResponse),
            DispatchError::ProviderUnavailable(_)
        ));
    }

    #[test]
    fn test_provider_failure_maps_to_service_unavailable() {
        let app_err = AppError::from(DispatchError::from(ProviderError::EmptyResponse));
        assert_eq!(app_err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            app_err.public_message(),
            "AI service unavailable: No AI response. Check OPENROUTER_API_KEY or GEMINI_API_KEY."
        );
    }

    #[test]
    fn test_client_faults_map_to_bad_request() {
        let gap = DispatchError::from_numeric("hcf", NumericError::NoValidOperands);
        let app_err = AppError::from(gap);
        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(app_err.public_message(), "hcf array must contain valid integers");
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let app_err = AppError::from(DispatchError::Internal(anyhow::anyhow!("serializer exploded")));
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_err.public_message(), "Internal server error");
    }
}

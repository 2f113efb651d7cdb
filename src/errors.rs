use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream asked us to slow down (HTTP 429 / RESOURCE_EXHAUSTED).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    /// True when the failure is a rate-limit signal worth backing off for.
    /// Upstream responses are classified when they arrive, so only
    /// `RateLimited` counts here.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::ExternalServiceError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_variant_is_retryable() {
        assert!(AppError::RateLimited("quota".to_string()).is_rate_limited());
    }

    #[test]
    fn test_transport_error_with_429_in_url_is_not_retryable() {
        let err = AppError::ExternalServiceError(
            "Gemini request failed: error sending request for url \
             (http://127.0.0.1:4290/v1beta/models/m:generateContent)"
                .to_string(),
        );
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_other_errors_are_not_retryable() {
        assert!(!AppError::ExternalServiceError("HTTP 500".to_string()).is_rate_limited());
        assert!(!AppError::BadRequest("429".to_string()).is_rate_limited());
    }

    #[test]
    fn test_external_service_error_maps_to_502() {
        let response = AppError::ExternalServiceError("HTTP 500".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("Unknown resort".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let response = AppError::RateLimited("slow down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

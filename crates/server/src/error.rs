//! Structured errors for the msgsearch HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use msgsearch_core::Error;
use serde_json::json;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(err @ Error::InvalidInput(_)) => (StatusCode::BAD_REQUEST, err.code()),
            ApiError::Core(err @ Error::RefreshFailed(_)) => (StatusCode::BAD_GATEWAY, err.code()),
            ApiError::Core(err @ Error::Config(_)) => (StatusCode::INTERNAL_SERVER_ERROR, err.code()),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Core(Error::InvalidInput(msg)) | ApiError::Core(Error::RefreshFailed(msg)) => msg.clone(),
            ApiError::Core(Error::Config(err)) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }

        (status, Json(json!({ "error": code, "message": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err: ApiError = Error::InvalidInput("limit must be >= 1".into()).into();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_INPUT"));
        assert_eq!(err.message(), "limit must be >= 1");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_is_internal() {
        let err: ApiError = Error::from(msgsearch_core::ConfigError::Missing {
            field: "upstream_api_url".into(),
            hint: "set MSGSEARCH_UPSTREAM_API_URL".into(),
        })
        .into();
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"));
    }

    #[test]
    fn test_refresh_failure_is_bad_gateway() {
        let err: ApiError = Error::RefreshFailed("parse error".into()).into();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "REFRESH_FAILED"));
        assert_eq!(err.message(), "parse error");
    }
}

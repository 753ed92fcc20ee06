// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::{ChatError, StorageError};

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.message,
        });
        (self.status_code, Json(body)).into_response()
    }
}

// Every service failure crossing the HTTP boundary becomes a structured
// `{success: false, error}` response; nothing escapes to crash the process.
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Unauthenticated => ApiError::unauthorized("User not authenticated"),
            ChatError::Upstream(upstream) => {
                error!("upstream completion error: {upstream:#}");
                ApiError::internal(upstream.to_string())
            }
            ChatError::Storage(storage) => {
                error!("transcript storage error: {storage:#}");
                ApiError::internal("Failed to persist chat history")
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::from(ChatError::Storage(err))
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;

    #[test]
    fn test_api_error_creation() {
        let error = ApiError::internal("Test error");
        assert_eq!(error.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "Test error");
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let error = ApiError::from(ChatError::Unauthenticated);
        assert_eq!(error.status_code, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_maps_to_500_with_the_cause() {
        let error = ApiError::from(ChatError::Upstream(UpstreamError::Status {
            status: 429,
            body: "rate limit exceeded".to_string(),
        }));
        assert_eq!(error.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.message.contains("429"));
    }
}

//! API error types and conversions
//!
//! Clients get a fixed, generic body per outcome; the full failure chain
//! goes to the logs only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shop_gateway::AggregateError;
use thiserror::Error;

/// API error type that converts to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 Not Found - the requested user does not exist (or the id is
    /// not a valid user id at all)
    #[error("user {user_id} not found")]
    UserNotFound { user_id: String },

    /// 500 Internal Server Error - an upstream dependency failed
    #[error("aggregation failed: {source}")]
    AggregationFailed {
        #[source]
        source: AggregateError,
    },
}

/// Client-facing error body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::UserNotFound { .. } => (StatusCode::NOT_FOUND, "User not found"),
            ApiError::AggregationFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to aggregate user orders",
            ),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = %self, "API error");
        } else {
            tracing::debug!(error = %self, "API client error");
        }

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::EntityNotFound { user_id } => ApiError::UserNotFound {
                user_id: user_id.to_string(),
            },
            other @ AggregateError::UpstreamUnavailable { .. } => {
                ApiError::AggregationFailed { source: other }
            }
        }
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`, and
//! every error body has the shape `{"message": "..."}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use ecoleta_core::{ItemIdListError, PointError};

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Unknown item ids surface as a client error.
            Self::Database(RepositoryError::InvalidReference(msg)) | Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            err @ (Self::Database(_) | Self::Internal(_)) => {
                // Capture server errors to Sentry
                let event_id = sentry::capture_error(&err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "Request error"
                );

                // Don't expose internal error details to clients
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<PointError> for AppError {
    fn from(err: PointError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ItemIdListError> for AppError {
    fn from(err: ItemIdListError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures store failures to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A use case failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request carried no valid API token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::ValidationFailed(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::StoreFailure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Service(ServiceError::StoreFailure(source)) = &self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %source,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(ServiceError::StoreFailure(_)) => "Internal server error".to_string(),
            Self::Service(err) => err.to_string(),
            Self::Unauthorized(_) => "Unauthorized".to_string(),
        };

        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

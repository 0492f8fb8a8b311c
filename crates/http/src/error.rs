//! Error handling for the HTTP layer
//!
//! Every non-2xx response leaves through [`AppError::into_response`], which
//! renders the uniform envelope:
//!
//! ```json
//! { "error": { "code": "HTTP_ERROR", "message": "Book not found", "details": [] } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::FieldError;

/// Envelope code for lookup and domain failures (400/404/409).
pub const HTTP_ERROR: &str = "HTTP_ERROR";
/// Envelope code for input-shape failures (422).
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Envelope code for store and unexpected failures (500).
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const VALIDATION_MESSAGE: &str = "Request validation failed";
const INTERNAL_MESSAGE: &str = "An internal server error occurred";

/// Standard error body for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {} field(s) rejected", .details.len())]
    Validation { details: Vec<FieldError> },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a validation error carrying one entry per rejected field
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::Validation { details }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a method not allowed error
    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed
    }

    /// Create a request timeout error
    pub fn timeout() -> Self {
        Self::Timeout
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        let status = self.status();
        match self {
            AppError::Validation { details } => ErrorBody {
                code: VALIDATION_ERROR,
                message: VALIDATION_MESSAGE.to_string(),
                details,
            },
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message } => ErrorBody {
                code: HTTP_ERROR,
                message,
                details: Vec::new(),
            },
            AppError::MethodNotAllowed | AppError::Timeout => ErrorBody {
                code: HTTP_ERROR,
                message: status.canonical_reason().unwrap_or_default().to_string(),
                details: Vec::new(),
            },
            AppError::Database(_) | AppError::Internal(_) => ErrorBody {
                code: INTERNAL_ERROR,
                message: INTERNAL_MESSAGE.to_string(),
                details: Vec::new(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %self,
                "request failed"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %self,
                "request rejected"
            );
        }

        let envelope = ErrorEnvelope {
            error: self.into_body(),
        };

        (status, Json(envelope)).into_response()
    }
}

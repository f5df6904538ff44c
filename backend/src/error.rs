//! Application error handling
//!
//! One taxonomy for the whole core. Every kind maps to a stable code and
//! HTTP status so callers can branch on it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chirp_shared::types::{ErrorDetail, ErrorResponse};
use thiserror::Error;
use tracing::{debug, error};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("A user is already registered with that email address")]
    EmailTaken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Unknown email and wrong password collapse into this one kind.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The reason is for logs only; it is never sent to the client.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Already following {0}")]
    AlreadyFollowing(String),

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::EmailTaken => "EMAIL_TAKEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::AlreadyFollowing(_) => "ALREADY_FOLLOWING",
            ApiError::SelfFollow => "SELF_FOLLOW",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmailTaken | ApiError::AlreadyFollowing(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::SelfFollow | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match &self {
            ApiError::InvalidToken(reason) => {
                debug!(reason = %reason, "Rejected bearer token");
                "Invalid or expired token".to_string()
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field: None,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

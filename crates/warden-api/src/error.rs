//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps token, store and validation errors to HTTP status codes with JSON
//! bodies carrying an error code, message, and optional details.
//!
//! Authentication failures of every kind (missing, malformed, bad signature,
//! expired, unknown subject, bad credentials) collapse into one
//! [`AppError::Unauthorized`] with one fixed message, so the response never
//! reveals which check failed. The specific kind is logged where it is known.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use warden_core::{CoreError, CredentialError, StoreError};
use warden_token::TokenError;

/// The single message returned for any authentication failure.
pub const UNAUTHENTICATED_MESSAGE: &str = "authentication required";

/// Structured JSON error response body.
///
/// The `details` field carries extra context for 422 validation errors
/// and is omitted otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "UNAUTHORIZED", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The uniform authentication failure.
    pub fn unauthenticated() -> Self {
        Self::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Authentication failures become the uniform 401; secret and signing
/// faults are server errors.
impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        if err.is_authentication_failure() {
            Self::unauthenticated()
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredentials => Self::unauthenticated(),
            CredentialError::Hashing(msg) => Self::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::InvalidEmail(_) | CoreError::WeakPassword(_) | CoreError::EmptyName => {
                Self::Validation(err.to_string())
            }
            CoreError::Hashing(_) => Self::Internal(err.to_string()),
        }
    }
}

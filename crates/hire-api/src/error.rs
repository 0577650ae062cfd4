//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Ledger rejections keep their stable machine code from
//! [`LedgerError::code`] and map onto 403, 404, 409 or 422. Journal
//! failures are logged and surface as an opaque 500 or 503.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hire_core::LedgerError;
use hire_ledger::ServiceError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "ALREADY_REVOKED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body or path could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The ledger rejected the operation.
    #[error(transparent)]
    Rejected(#[from] LedgerError),

    /// Writes are halted until the service restarts (503).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Rejected(err) => (ledger_status(err), err.code()),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

fn ledger_status(err: &LedgerError) -> StatusCode {
    use LedgerError as E;
    match err {
        E::Unauthorized(_)
        | E::NotRegistered(_)
        | E::SelfApplicationForbidden(_)
        | E::TransfersDisabled
        | E::ApprovalsDisabled => StatusCode::FORBIDDEN,
        E::NotFound(_) => StatusCode::NOT_FOUND,
        E::InvalidState(_)
        | E::Expired { .. }
        | E::DuplicateApplication { .. }
        | E::AlreadyRegistered(_)
        | E::AlreadyRevoked(_)
        | E::AlreadyReviewed(_)
        | E::Revoked(_) => StatusCode::CONFLICT,
        E::InvalidInput(_) | E::InvalidDeadline { .. } | E::LengthMismatch { .. } | E::BatchTooLarge { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
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
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(e) => Self::Rejected(e),
            ServiceError::Halted => Self::Unavailable(err.to_string()),
            ServiceError::Journal(e) => Self::Internal(e.to_string()),
        }
    }
}

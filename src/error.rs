//! # Centralized Error Handling
//!
//! This module provides a unified error handling system for the application.
//! It centralizes error logging and HTTP response generation, so every handler
//! can propagate failures with `?` and still answer with the same
//! `{ status, message }` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::account::AccountError;
use crate::services::payment::PaymentError;
use crate::store::StoreError;

/// Central application error type that encompasses all possible error conditions.
///
/// Each variant keeps its own kind so callers and logs can tell a missing
/// record from a duplicate or a backend outage. _Backend failures are logged
/// automatically, while other errors should be logged at the point of creation
/// if needed._
#[derive(Error, Debug)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("serialization error")]
    Json(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("internal server error")]
    Internal,
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound => AppError::NotFound("User not found"),
            AccountError::InvalidCredentials => AppError::Unauthorized("Invalid credentials"),
            AccountError::AlreadyExists => AppError::Conflict("User already exists"),
            AccountError::ProtectedField(_) => {
                AppError::BadRequest("Settings may not change id, email, password or role")
            }
            AccountError::Store(e) => AppError::Store(e),
            AccountError::Hash(e) => {
                error!(error = %e, "Password hashing failed");
                AppError::Internal
            }
            AccountError::Corrupt(e) => {
                error!(error = %e, "Stored account record is malformed");
                AppError::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Central logging - log details for backend errors, minimal for client errors
        match &self {
            AppError::Store(e @ (StoreError::Db(_) | StoreError::Timestamp(_))) => {
                error!(error = %e, "Record store failure");
            }
            AppError::Payment(e) => warn!(error = %e, "Payment collaborator failure"),
            AppError::Json(e) => error!(error = %e, "Failed to serialize response payload"),
            _ => {}
        }

        let (status, message) = match self {
            AppError::Store(StoreError::Duplicate { .. }) => {
                (StatusCode::CONFLICT, "Record already exists")
            }
            AppError::Store(StoreError::RecordNotFound) => (StatusCode::NOT_FOUND, "Record not found"),
            AppError::Store(StoreError::MissingId) => (StatusCode::BAD_REQUEST, "Record id missing"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::Payment(_) => (StatusCode::BAD_GATEWAY, "Error processing payment"),
            AppError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(ErrorBody {
            status: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;

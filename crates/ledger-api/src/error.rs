//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`. Every
//! failure is rendered as `{ "message": ... }` with a fixed, caller-facing
//! message; internal details are logged and never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledger_core::ValidationError;
use ledger_service::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned for every malformed request.
pub const INVALID_FORMAT_MESSAGE: &str =
    "Invalid credential format. It must be a JSON object with an id property.";
/// Message returned when a credential is issued twice.
pub const ALREADY_ISSUED_MESSAGE: &str = "Credential already issued.";
/// Message returned when verifying an unknown credential.
pub const NOT_FOUND_MESSAGE: &str = "Credential not found.";
/// Message returned for every internal failure.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body is not a credential envelope (400).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The credential is already on the ledger (409).
    #[error("credential already issued")]
    Conflict,

    /// The credential is not on the ledger (404).
    #[error("credential not found")]
    NotFound,

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and caller-facing message for this error.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, INVALID_FORMAT_MESSAGE),
            Self::Conflict => (StatusCode::CONFLICT, ALREADY_ISSUED_MESSAGE),
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::InvalidInput(reason) => tracing::debug!(%reason, "rejected malformed request"),
            Self::Conflict | Self::NotFound => {}
        }

        let body = ErrorBody {
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(e) => e.into(),
            ServiceError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps validation, token and storage errors to HTTP status codes.
//!
//! Clients only ever see a fixed message per status. The detail carried by
//! each variant is written to the log at the level the failure deserves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use saathi_core::ValidationError;
use saathi_token::TokenError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::StoreError;

/// JSON body of every response on the location surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    /// Human-readable outcome.
    #[schema(example = "Location saved")]
    pub message: String,
}

impl MessageBody {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// No `Authorization` header was sent (401).
    #[error("missing authorization header")]
    MissingToken,

    /// The header or token was rejected (401). Carries a short reason category.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// The request body failed validation (400).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Storage or wiring failure (500). Detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "No token"),
            Self::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Self::InvalidData(_) => (StatusCode::BAD_REQUEST, "Invalid data"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingToken => {
                tracing::warn!("authentication failed: missing authorization header")
            }
            Self::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "authentication failed: invalid token")
            }
            Self::InvalidData(detail) => tracing::debug!(detail = %detail, "rejected upload"),
            Self::Internal(detail) => tracing::error!(error = %detail, "internal server error"),
        }

        let (status, message) = self.status_and_message();
        (status, Json(MessageBody::new(message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidData(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::InvalidToken(err.reason())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

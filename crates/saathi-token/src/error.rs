//! # Token Error Types
//!
//! Structured errors for token verification and issuance.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Errors from verifying or issuing a bearer token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed JWT (segments, base64, JSON).
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not match the configured secret.
    #[error("token signature mismatch")]
    BadSignature,

    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// The token's `nbf` is in the future.
    #[error("token not yet valid")]
    NotYetValid,

    /// The header names an algorithm outside the HMAC family.
    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,

    /// The payload has no usable `userId` claim.
    #[error("token carries no user id")]
    MissingUserId,

    /// The signing secret is empty.
    #[error("token secret must not be empty")]
    EmptySecret,

    /// The requested lifetime puts `exp` past the last representable time.
    #[error("token expiry out of range")]
    ExpiryOutOfRange,

    /// Signing failed while issuing a token.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Short category for structured logs. Never includes token material.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::MissingUserId => "missing_user_id",
            Self::EmptySecret => "empty_secret",
            Self::ExpiryOutOfRange => "expiry_out_of_range",
            Self::Encoding(_) => "encoding",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::UnsupportedAlgorithm,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

//! # Authentication Middleware
//!
//! Bearer token guard for the location routes. Health probes, metrics and
//! the OpenAPI document are mounted outside it.
//!
//! ## Header format
//!
//! ```text
//! Authorization: <scheme> <jwt>
//! ```
//!
//! The header must split into exactly two whitespace-separated parts. The
//! scheme word is not inspected; the signature check is what admits a
//! request. See `saathi_token` for the token format.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::{self, HeaderValue};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use saathi_core::UserId;
use saathi_token::{IdentityClaim, TokenVerifier};

use crate::error::AppError;

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The user every write in this request is attributed to.
    pub user_id: UserId,
    /// When the token was issued, if it says.
    pub issued_at: Option<DateTime<Utc>>,
    /// When the token stops being accepted, if ever.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<IdentityClaim> for CallerIdentity {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            user_id: claim.user_id,
            issued_at: claim.issued_at,
            expires_at: claim.expires_at,
        }
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// Absent or empty header is [`AppError::MissingToken`]. Anything that is
/// not two whitespace-separated visible-ASCII parts is
/// [`AppError::InvalidToken`].
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AppError::MissingToken),
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::InvalidToken("non_ascii_header"))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        _ => Err(AppError::InvalidToken("malformed_header")),
    }
}

/// Verify the bearer token and inject the caller's identity.
///
/// Expects an `Arc<TokenVerifier>` extension layered outside this
/// middleware; without it every request fails with 500.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(verifier) = request.extensions().get::<Arc<TokenVerifier>>().cloned() else {
        return AppError::Internal("token verifier extension missing".into()).into_response();
    };

    let verdict = bearer_token(request.headers().get(header::AUTHORIZATION))
        .and_then(|token| verifier.verify(token).map_err(AppError::from));

    match verdict {
        Ok(claim) => {
            request.extensions_mut().insert(CallerIdentity::from(claim));
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

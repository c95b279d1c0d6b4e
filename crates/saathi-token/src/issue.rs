//! Token issuance.
//!
//! Production tokens come from the registration service. This issuer
//! produces the same format for development tooling and tests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use saathi_core::UserId;

use crate::claims::WireClaims;
use crate::error::TokenError;
use crate::secret::TokenSecret;

/// Signs HS256 tokens with the shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    /// Create an issuer for the given secret.
    pub fn new(secret: &TokenSecret) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id`, valid for `ttl` (or forever if `None`).
    ///
    /// Fails with [`TokenError::ExpiryOutOfRange`] when `now + ttl` is not
    /// a representable time.
    pub fn issue(&self, user_id: &UserId, ttl: Option<Duration>) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = ttl
            .map(|ttl| {
                now.checked_add_signed(ttl)
                    .ok_or(TokenError::ExpiryOutOfRange)
            })
            .transpose()?;
        self.issue_at(user_id, now, expires_at)
    }

    /// Issue a token with explicit issue and expiry times.
    pub fn issue_at(
        &self,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<String, TokenError> {
        let claims = WireClaims {
            user_id: Some(user_id.to_string()),
            iat: Some(issued_at.timestamp()),
            exp: expires_at.map(|t| t.timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

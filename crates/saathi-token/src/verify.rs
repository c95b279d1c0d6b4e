//! Token verification.

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::{IdentityClaim, WireClaims};
use crate::error::TokenError;
use crate::secret::TokenSecret;

/// Verifies bearer tokens against the shared secret.
///
/// Cheap to clone; built once at startup and shared by every request.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier for the HMAC family (HS256/HS384/HS512).
    pub fn new(secret: &TokenSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // Issuers may omit `exp`; it is checked only when present.
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify signature and time claims, then extract the caller identity.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        let data = decode::<WireClaims>(token, &self.key, &self.validation)?;
        // jsonwebtoken reads `exp` as u64 and skips the check for negative values.
        if data.claims.exp.is_some_and(|exp| exp < Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }
        IdentityClaim::try_from(data.claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

//! Shared HMAC secret.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TokenError;

/// The HMAC secret shared with the token issuer.
///
/// Zeroized on drop. Custom `Debug` never prints the value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Wrap a secret, rejecting the empty string.
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self(secret))
    }

    /// Raw key bytes for the signing/verification keys.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether this secret equals `candidate`. Used to detect development defaults.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret([REDACTED])")
    }
}

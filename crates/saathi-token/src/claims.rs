//! Token payloads: the raw wire form and the verified identity.

use chrono::{DateTime, TimeZone, Utc};
use saathi_core::UserId;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// JWT payload as issued by the registration service.
///
/// Unknown claims (email, role, ...) are ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireClaims {
    /// The `userId` claim.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Issued-at, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry, seconds since the epoch. Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    /// The authenticated user.
    pub user_id: UserId,
    /// From `iat`, when present and representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// From `exp`, when present and representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<WireClaims> for IdentityClaim {
    type Error = TokenError;

    fn try_from(claims: WireClaims) -> Result<Self, Self::Error> {
        let user_id = claims
            .user_id
            .and_then(|id| UserId::new(id).ok())
            .ok_or(TokenError::MissingUserId)?;
        Ok(Self {
            user_id,
            issued_at: claims.iat.and_then(from_unix),
            expires_at: claims.exp.and_then(from_unix),
        })
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

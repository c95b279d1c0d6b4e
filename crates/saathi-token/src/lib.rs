//! # saathi-token — Bearer Tokens for Safar Saathi
//!
//! Tokens are compact JWTs signed with a shared HMAC secret. The
//! registration service issues them; the location API only verifies them.
//!
//! ## Wire format
//!
//! ```text
//! header  { "alg": "HS256", "typ": "JWT" }
//! payload { "userId": "<opaque id>", "iat": 1704067200, "exp": 1704153600 }
//! ```
//!
//! `HS256`, `HS384` and `HS512` are accepted. `exp` and `nbf` are enforced
//! when present, with zero leeway. A token without `exp` never expires.
//!
//! ## Security Invariants
//!
//! - The secret lives in a [`TokenSecret`], zeroized on drop and redacted
//!   from `Debug` output.
//! - Every verification failure maps to a [`TokenError`]; callers decide
//!   how much of that to reveal (the API reveals none of it).

pub mod claims;
pub mod error;
pub mod issue;
pub mod secret;
pub mod verify;

pub use claims::{IdentityClaim, WireClaims};
pub use error::TokenError;
pub use issue::TokenIssuer;
pub use secret::TokenSecret;
pub use verify::TokenVerifier;

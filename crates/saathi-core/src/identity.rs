//! # Identity Newtypes
//!
//! The identity of a reporting principal. User identifiers are issued by
//! the external registration service and are opaque to this system; the
//! only invariant enforced here is that they are never empty.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of the user a location belongs to.
///
/// Serializes as a plain string. Construction through [`UserId::new`] (or
/// deserialization) rejects empty and whitespace-only values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a validated user identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

//! # Error Hierarchy
//!
//! Validation errors for inbound data, built with `thiserror`.
//!
//! Every variant carries enough context for an operator reading the logs
//! to see which field failed and why. None of this detail is returned to
//! API clients; the HTTP layer collapses all of it into a generic message.

use thiserror::Error;

/// Validation failures for domain primitives and upload payloads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The request body is not a JSON object.
    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A required field is absent, null, or falsy.
    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    /// A coordinate field is present but is not a JSON number.
    #[error("field \"{field}\" must be a number, got {found}")]
    NotANumber {
        /// The offending field name.
        field: &'static str,
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// The timestamp could not be interpreted as a point in time.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The raw value, rendered as JSON.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A user identifier is empty or whitespace-only.
    #[error("user id must be non-empty")]
    EmptyUserId,
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

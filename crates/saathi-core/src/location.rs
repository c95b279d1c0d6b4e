//! # Location Types
//!
//! The lifecycle of one reported position:
//!
//! ```text
//! JSON body ──TryFrom──▶ LocationReport ──attribute_to(UserId)──▶ NewLocation ──store──▶ LocationRecord
//! ```
//!
//! Coordinates are accepted as any JSON number. Geographic range
//! (±90 / ±180) is deliberately not checked; out-of-range values are
//! stored as reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{json_type_name, ValidationError};
use crate::identity::UserId;
use crate::temporal::parse_client_timestamp;

/// A validated location upload, not yet attributed to a user.
///
/// Built only through `TryFrom<&serde_json::Value>`, so every instance has
/// numeric coordinates and a parsed timestamp. Any `userId` field present
/// in the body is ignored; identity comes from the verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    /// Reported latitude.
    pub latitude: f64,
    /// Reported longitude.
    pub longitude: f64,
    /// When the client took the reading.
    pub timestamp: DateTime<Utc>,
}

impl LocationReport {
    /// Stamp this report with the identity of the reporting user.
    pub fn attribute_to(self, user_id: UserId) -> NewLocation {
        NewLocation {
            user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp,
        }
    }
}

impl TryFrom<&Value> for LocationReport {
    type Error = ValidationError;

    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        let obj = body
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(json_type_name(body)))?;

        let latitude = number_field(obj, "latitude")?;
        let longitude = number_field(obj, "longitude")?;
        let timestamp = parse_client_timestamp(obj.get("timestamp"))?;

        Ok(Self {
            latitude,
            longitude,
            timestamp,
        })
    }
}

fn number_field(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<f64, ValidationError> {
    match obj.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::NotANumber {
            field,
            found: "number",
        }),
        Some(other) => Err(ValidationError::NotANumber {
            field,
            found: json_type_name(other),
        }),
    }
}

/// A location ready to be written: a report plus its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    /// Owner of the reading.
    pub user_id: UserId,
    /// Reported latitude.
    pub latitude: f64,
    /// Reported longitude.
    pub longitude: f64,
    /// When the client took the reading.
    pub timestamp: DateTime<Utc>,
}

impl NewLocation {
    /// Materialise the stored form, assigning an id and write times.
    ///
    /// Stores that let the database assign creation times use their own
    /// values instead.
    pub fn into_record(self, id: Uuid, written_at: DateTime<Utc>) -> LocationRecord {
        LocationRecord {
            id,
            user_id: self.user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp,
            created_at: written_at,
            updated_at: written_at,
        }
    }
}

/// A persisted location reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Storage key.
    pub id: Uuid,
    /// Owner of the reading.
    pub user_id: UserId,
    /// Reported latitude.
    pub latitude: f64,
    /// Reported longitude.
    pub longitude: f64,
    /// When the client took the reading.
    pub timestamp: DateTime<Utc>,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at`; records are never updated.
    pub updated_at: DateTime<Utc>,
}

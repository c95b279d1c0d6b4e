//! # Client Timestamps
//!
//! Mobile clients report the moment a reading was taken in whatever form
//! their platform produces: ISO-8601 strings with or without an offset,
//! HTTP-style RFC 2822 dates, or epoch milliseconds. Everything is
//! normalised to `DateTime<Utc>` here.
//!
//! ## Accepted forms
//!
//! | Input                                   | Interpretation            |
//! |-----------------------------------------|---------------------------|
//! | `"2024-01-01T00:00:00Z"`, `"...+05:30"` | RFC 3339                  |
//! | `"2024-01-01T00:00:00"`, `"2024-01-01 00:00"` | ISO-8601, no offset, UTC |
//! | `"2024-01-01"`                          | UTC midnight              |
//! | `"2024-03"`, `"2024"`                   | first day, UTC midnight   |
//! | `"Mon, 01 Jan 2024 00:00:00 GMT"`       | RFC 2822                  |
//! | `1704067200000`, `"1704067200000"`      | epoch milliseconds        |
//!
//! A bare four-digit string is a year, not a millisecond count.
//!
//! `null`, `false`, `0` and `""` count as a missing timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{json_type_name, ValidationError};

const FIELD: &str = "timestamp";

/// Largest magnitude, in milliseconds from the epoch, a client timestamp may have.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

/// ISO-8601 layouts without an offset, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse the `timestamp` field of an upload body.
///
/// `value` is `None` when the field is absent from the body.
pub fn parse_client_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, ValidationError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            Err(ValidationError::MissingField(FIELD))
        }
        Some(Value::Number(n)) => {
            if let Some(ms) = n.as_i64() {
                if ms == 0 {
                    return Err(ValidationError::MissingField(FIELD));
                }
                return from_epoch_millis(ms, value);
            }
            match n.as_f64() {
                Some(f) if f == 0.0 => Err(ValidationError::MissingField(FIELD)),
                Some(f) if f.is_finite() && f.abs() <= MAX_EPOCH_MILLIS as f64 => {
                    from_epoch_millis(f.trunc() as i64, value)
                }
                _ => Err(invalid(value, "epoch milliseconds out of range")),
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ValidationError::MissingField(FIELD));
            }
            parse_str(s).ok_or_else(|| invalid(value, "unrecognised date format"))
        }
        Some(other) => Err(invalid(
            value,
            &format!("{} is not a point in time", json_type_name(other)),
        )),
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Some(date) = parse_date(s) {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if is_epoch_digits(s) {
        let ms: i64 = s.parse().ok()?;
        if ms.unsigned_abs() > MAX_EPOCH_MILLIS.unsigned_abs() {
            return None;
        }
        return Utc.timestamp_millis_opt(ms).single();
    }
    None
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    match s.len() {
        7 if s.as_bytes()[4] == b'-' => {
            NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
        }
        4 if s.bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)
        }
        _ => None,
    }
}

fn is_epoch_digits(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn from_epoch_millis(ms: i64, raw: Option<&Value>) -> Result<DateTime<Utc>, ValidationError> {
    if ms.unsigned_abs() > MAX_EPOCH_MILLIS.unsigned_abs() {
        return Err(invalid(raw, "epoch milliseconds out of range"));
    }
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| invalid(raw, "epoch milliseconds out of range"))
}

fn invalid(raw: Option<&Value>, reason: &str) -> ValidationError {
    ValidationError::InvalidTimestamp {
        value: raw.map(Value::to_string).unwrap_or_default(),
        reason: reason.to_string(),
    }
}

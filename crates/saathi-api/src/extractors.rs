//! # Body Extraction & Validation
//!
//! Upload bodies are taken as untyped `serde_json::Value` and converted
//! into a domain type by explicit schema validation. Deserialization
//! failures and validation failures both surface as
//! [`AppError::InvalidData`].

use axum::extract::rejection::JsonRejection;
use axum::Json;
use saathi_core::ValidationError;
use serde_json::Value;

use crate::error::AppError;

/// Extract a JSON body, mapping rejections (bad JSON, wrong content type,
/// oversized body) to [`AppError::InvalidData`].
pub fn extract_json(result: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::InvalidData(err.body_text()))
}

/// Extract a JSON body and validate it into `T`.
///
/// ```ignore
/// async fn handler(body: Result<Json<Value>, JsonRejection>) -> Result<..., AppError> {
///     let report: LocationReport = extract_validated_json(body)?;
/// }
/// ```
pub fn extract_validated_json<T>(result: Result<Json<Value>, JsonRejection>) -> Result<T, AppError>
where
    T: for<'a> TryFrom<&'a Value, Error = ValidationError>,
{
    let value = extract_json(result)?;
    Ok(T::try_from(&value)?)
}

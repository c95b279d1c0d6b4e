//! # Location Ingest
//!
//! `POST /location/upload` stores one reading for the authenticated
//! caller. The owner always comes from the verified token; a `userId` in
//! the body is ignored.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use saathi_core::LocationReport;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::{AppError, MessageBody};
use crate::extractors::extract_validated_json;
use crate::state::AppState;

/// Upload body, for documentation. The handler validates the raw JSON
/// into a [`LocationReport`] instead of deserializing this type.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationUploadRequest {
    /// Latitude as a JSON number. Range is not checked.
    #[schema(example = 12.97)]
    pub latitude: f64,
    /// Longitude as a JSON number. Range is not checked.
    #[schema(example = 77.59)]
    pub longitude: f64,
    /// When the reading was taken: ISO-8601 / RFC 3339, RFC 2822, or epoch milliseconds.
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub timestamp: String,
}

/// Build the location router.
pub fn router() -> Router<AppState> {
    Router::new().route("/location/upload", post(upload_location))
}

/// POST /location/upload — Store one location reading.
#[utoipa::path(
    post,
    path = "/location/upload",
    request_body = LocationUploadRequest,
    responses(
        (status = 200, description = "Location saved", body = MessageBody),
        (status = 400, description = "Invalid data", body = MessageBody),
        (status = 401, description = "No token or invalid token", body = MessageBody),
        (status = 500, description = "Server error", body = MessageBody),
    ),
    security(("bearer_auth" = [])),
    tag = "location"
)]
pub async fn upload_location(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let report: LocationReport = extract_validated_json(body)?;
    let record = state.store.insert(report.attribute_to(caller.user_id)).await?;

    tracing::info!(location_id = %record.id, "location saved");
    Ok(Json(MessageBody::new("Location saved")))
}

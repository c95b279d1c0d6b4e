//! # Integration Tests for saathi-api
//!
//! Drives the full router: authentication outcomes, upload validation,
//! persistence through the in-memory store, storage failure handling,
//! body limits, request timeouts, health probes, metrics and the OpenAPI
//! document.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use saathi_api::config::AppConfig;
use saathi_api::db::memory::MemoryLocationStore;
use saathi_api::db::{LocationStore, StoreError};
use saathi_api::state::AppState;
use saathi_core::{LocationRecord, NewLocation, UserId};
use saathi_token::{TokenIssuer, TokenSecret};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

/// Store whose every operation fails.
struct FailingStore;

#[axum::async_trait]
impl LocationStore for FailingStore {
    async fn insert(&self, _location: NewLocation) -> Result<LocationRecord, StoreError> {
        Err(StoreError::Unavailable(
            "connection refused (db.internal:5432)".into(),
        ))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Store that takes longer than any test timeout to answer.
struct SlowStore;

#[axum::async_trait]
impl LocationStore for SlowStore {
    async fn insert(&self, _location: NewLocation) -> Result<LocationRecord, StoreError> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Err(StoreError::Unavailable("too slow".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn config_with(extra: &[(&'static str, &'static str)]) -> AppConfig {
    let vars: HashMap<&str, &str> = [("JWT_SECRET", SECRET), ("SAATHI_STORAGE", "memory")]
        .into_iter()
        .chain(extra.iter().copied())
        .collect();
    AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap()
}

fn test_config() -> AppConfig {
    config_with(&[])
}

/// Helper: build the app over a shared in-memory store.
fn test_app() -> (axum::Router, MemoryLocationStore) {
    let store = MemoryLocationStore::new();
    let state = AppState::new(test_config(), Arc::new(store.clone()));
    (saathi_api::app(state), store)
}

fn failing_app() -> axum::Router {
    saathi_api::app(AppState::new(test_config(), Arc::new(FailingStore)))
}

fn token(user: &str) -> String {
    let secret = TokenSecret::new(SECRET).unwrap();
    TokenIssuer::new(&secret)
        .issue(&UserId::new(user).unwrap(), Some(Duration::hours(1)))
        .unwrap()
}

fn upload(auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/location/upload")
        .header("content-type", "application/json");
    if let Some(value) = auth {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn valid_body() -> Value {
    json!({"latitude": 12.97, "longitude": 77.59, "timestamp": "2024-01-01T00:00:00Z"})
}

/// Helper: read response status and body as JSON.
async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_missing_header_is_no_token() {
    let (app, store) = test_app();
    let (status, body) = send(app, upload(None, &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "No token"}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_single_part_header_is_invalid_token() {
    let (app, store) = test_app();
    let (status, body) = send(app, upload(Some(token("u1").as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Invalid token"}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_three_part_header_is_invalid_token() {
    let (app, _) = test_app();
    let auth = format!("Bearer {} extra", token("u1"));
    let (status, body) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_wrongly_signed_token_is_invalid_token() {
    let (app, store) = test_app();
    let other = TokenSecret::new("some-other-secret").unwrap();
    let forged = TokenIssuer::new(&other)
        .issue(&UserId::new("u1").unwrap(), None)
        .unwrap();
    let auth = format!("Bearer {forged}");
    let (status, body) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_expired_token_is_invalid_token() {
    let (app, store) = test_app();
    let secret = TokenSecret::new(SECRET).unwrap();
    let issued = Utc::now() - Duration::hours(2);
    let expired = TokenIssuer::new(&secret)
        .issue_at(
            &UserId::new("u1").unwrap(),
            issued,
            Some(issued + Duration::hours(1)),
        )
        .unwrap();
    let auth = format!("Bearer {expired}");
    let (status, body) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_pre_epoch_expiry_is_invalid_token() {
    let (app, store) = test_app();
    let secret = TokenSecret::new(SECRET).unwrap();
    let expired = TokenIssuer::new(&secret)
        .issue_at(
            &UserId::new("u1").unwrap(),
            Utc.timestamp_opt(-10, 0).unwrap(),
            Some(Utc.timestamp_opt(-1, 0).unwrap()),
        )
        .unwrap();
    let auth = format!("Bearer {expired}");
    let (status, body) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_auth_runs_before_body_parsing() {
    let (app, _) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/location/upload")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token");
}

// -- Upload validation --------------------------------------------------------

#[tokio::test]
async fn test_string_latitude_is_invalid_data() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let body = json!({"latitude": "12.97", "longitude": 77.59, "timestamp": "2024-01-01T00:00:00Z"});
    let (status, resp) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({"message": "Invalid data"}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_timestamp_is_invalid_data() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let body = json!({"latitude": 12.97, "longitude": 77.59});
    let (status, resp) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid data");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unparseable_timestamp_is_invalid_data() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let body = json!({"latitude": 1.0, "longitude": 2.0, "timestamp": "yesterday-ish"});
    let (status, resp) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid data");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_data() {
    let (app, store) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/location/upload")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token("u1")))
        .body(Body::from("{\"latitude\": 1.0,"))
        .unwrap();
    let (status, resp) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid data");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_content_type_is_invalid_data() {
    let (app, store) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/location/upload")
        .header("authorization", format!("Bearer {}", token("u1")))
        .body(Body::from(valid_body().to_string()))
        .unwrap();
    let (status, resp) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({"message": "Invalid data"}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_invalid_data() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let mut body = valid_body();
    body["padding"] = json!("x".repeat(saathi_api::BODY_LIMIT_BYTES));
    let (status, resp) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({"message": "Invalid data"}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_body_just_under_limit_is_accepted() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let mut body = valid_body();
    body["padding"] = json!("x".repeat(saathi_api::BODY_LIMIT_BYTES - 1024));
    let (status, _) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_array_body_is_invalid_data() {
    let (app, _) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let (status, resp) = send(app, upload(Some(auth.as_str()), &json!([12.97, 77.59]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid data");
}

// -- Persistence --------------------------------------------------------------

#[tokio::test]
async fn test_valid_upload_persists_one_record() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let (status, body) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Location saved"}));

    let records = store.records();
    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.user_id, "u1");
    assert_eq!(rec.latitude, 12.97);
    assert_eq!(rec.longitude, 77.59);
    assert_eq!(rec.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert_eq!(rec.created_at, rec.updated_at);
}

#[tokio::test]
async fn test_body_user_id_is_ignored() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let body = json!({
        "userId": "someone-else",
        "latitude": 1.0,
        "longitude": 2.0,
        "timestamp": 1_704_067_200_000_i64
    });
    let (status, _) = send(app, upload(Some(auth.as_str()), &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.records()[0].user_id, "u1");
}

#[tokio::test]
async fn test_duplicate_submission_creates_two_records() {
    let (app, store) = test_app();
    let auth = format!("Bearer {}", token("u1"));
    let (first, _) = send(app.clone(), upload(Some(auth.as_str()), &valid_body())).await;
    let (second, _) = send(app, upload(Some(auth.as_str()), &valid_body())).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let records = store.records();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].id, records[1].id);
}

#[tokio::test]
async fn test_store_failure_is_server_error_without_detail() {
    let auth = format!("Bearer {}", token("u1"));
    let response = failing_app()
        .oneshot(upload(Some(auth.as_str()), &valid_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert_eq!(body, r#"{"message":"Server error"}"#);
    assert!(!body.contains("db.internal"));
}

#[tokio::test]
async fn test_slow_store_hits_request_timeout() {
    let config = config_with(&[("REQUEST_TIMEOUT_SECS", "1")]);
    let app = saathi_api::app(AppState::new(config, Arc::new(SlowStore)));
    let auth = format!("Bearer {}", token("u1"));
    let response = app
        .oneshot(upload(Some(auth.as_str()), &valid_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_readiness_probe_reports_store_outage() {
    let response = failing_app()
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_string(response).await, "unavailable");
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_status_classes() {
    let (app, _) = test_app();
    let auth = format!("Bearer {}", token("u1"));

    send(app.clone(), upload(Some(auth.as_str()), &valid_body())).await;
    send(app.clone(), upload(None, &valid_body())).await;

    let (status, body) = send(
        app,
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // The metrics request itself is counted after its response is built.
    assert_eq!(body, json!({"requests": 2, "client_errors": 1, "server_errors": 0}));
}

#[tokio::test]
async fn test_openapi_spec_is_public() {
    let (app, _) = test_app();
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/location/upload"].is_object());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .header("origin", "https://app.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

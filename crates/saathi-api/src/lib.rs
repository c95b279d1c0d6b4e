//! # saathi-api — Location Ingest Service
//!
//! Authenticated users report where they are; each report is validated
//! and stored as one location record.
//!
//! ## API Surface
//!
//! | Route                    | Auth   | Module                 |
//! |--------------------------|--------|------------------------|
//! | `POST /location/upload`  | bearer | [`routes::location`]   |
//! | `GET /health/liveness`   | none   | this module            |
//! | `GET /health/readiness`  | none   | this module            |
//! | `GET /metrics`           | none   | [`middleware::metrics`] |
//! | `GET /openapi.json`      | none   | [`openapi`]            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! Cors → Trace → Timeout → Metrics → BodyLimit → Auth (location routes only) → Handler
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Only the location routes sit behind the auth middleware; probes,
/// metrics and the OpenAPI document are reachable without credentials.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let verifier = state.verifier.clone();
    let timeout = state.config.request_timeout;

    let location = routes::location::router().route_layer(from_fn(auth::auth_middleware));

    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::metrics_handler))
        .merge(openapi::router());

    Router::new()
        .merge(location)
        .merge(public)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(Extension(metrics))
        .layer(Extension(verifier))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the location store answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

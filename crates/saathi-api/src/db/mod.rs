//! # Location Persistence
//!
//! The ingest handler writes through the [`LocationStore`] trait. Two
//! implementations exist:
//!
//! - [`locations::PgLocationStore`]: PostgreSQL via SQLx. The `locations`
//!   table is created by operators from `sql/locations.sql`; the service
//!   never runs DDL.
//! - [`memory::MemoryLocationStore`]: process-local, for development
//!   (`SAATHI_STORAGE=memory`) and tests.
//!
//! Records are insert-only. Nothing here updates or deletes a row.

pub mod locations;
pub mod memory;

use saathi_core::{LocationRecord, NewLocation};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::{redact_url, AppConfig};

/// Storage failures. The detail is for logs only.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database driver reported an error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a record.
    #[error("corrupt row {id}: {reason}")]
    CorruptRow {
        /// Row key.
        id: uuid::Uuid,
        /// What was wrong with it.
        reason: String,
    },

    /// The backend cannot take writes right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Insert-only sink for location readings.
#[axum::async_trait]
pub trait LocationStore: Send + Sync {
    /// Persist one reading and return the stored record.
    async fn insert(&self, location: NewLocation) -> Result<LocationRecord, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Open the PostgreSQL connection pool.
///
/// Fails if the database is unreachable at startup.
pub async fn init_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_max_connections.min(2))
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;

    tracing::info!(url = %redact_url(&config.database_url), "connected to PostgreSQL");
    Ok(pool)
}

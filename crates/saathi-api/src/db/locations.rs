//! PostgreSQL location store.
//!
//! All queries run against the `locations` table. The client timestamp is
//! stored in `recorded_at`; `created_at` and `updated_at` are assigned by
//! the database.

use chrono::{DateTime, Utc};
use saathi_core::{LocationRecord, NewLocation, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use super::{LocationStore, StoreError};

/// [`LocationStore`] backed by a `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    /// Wrap an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[axum::async_trait]
impl LocationStore for PgLocationStore {
    async fn insert(&self, location: NewLocation) -> Result<LocationRecord, StoreError> {
        let row = sqlx::query_as::<_, LocationRow>(
            "INSERT INTO locations (id, user_id, latitude, longitude, recorded_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, latitude, longitude, recorded_at, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(location.user_id.as_str())
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.timestamp)
        .fetch_one(&self.pool)
        .await?;

        row.into_record()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct LocationRow {
    id: Uuid,
    user_id: String,
    latitude: f64,
    longitude: f64,
    recorded_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LocationRow {
    fn into_record(self) -> Result<LocationRecord, StoreError> {
        let user_id = UserId::new(self.user_id).map_err(|e| StoreError::CorruptRow {
            id: self.id,
            reason: e.to_string(),
        })?;
        Ok(LocationRecord {
            id: self.id,
            user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.recorded_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

//! In-process location store.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use saathi_core::{LocationRecord, NewLocation};
use uuid::Uuid;

use super::{LocationStore, StoreError};

/// [`LocationStore`] that keeps records in memory.
///
/// Clones share the same records, so a test can keep a handle and inspect
/// what the router wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocationStore {
    records: Arc<RwLock<Vec<LocationRecord>>>,
}

impl MemoryLocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order.
    pub fn records(&self) -> Vec<LocationRecord> {
        self.records.read().clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[axum::async_trait]
impl LocationStore for MemoryLocationStore {
    async fn insert(&self, location: NewLocation) -> Result<LocationRecord, StoreError> {
        let record = location.into_record(Uuid::new_v4(), Utc::now());
        self.records.write().push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

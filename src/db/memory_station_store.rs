use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::{StationSnapshot, StationStore, StoreError};

/// In-memory [`StationStore`] used by the test suites and for running the
/// service without a database.
#[derive(Clone, Default)]
pub struct MemoryStationStore {
    inner: Arc<RwLock<HashMap<String, StationSnapshot>>>,
}

impl MemoryStationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl StationStore for MemoryStationStore {
    async fn get(&self, station_code: &str) -> Result<Option<StationSnapshot>, StoreError> {
        Ok(self.inner.read().await.get(station_code).cloned())
    }

    async fn upsert(&self, snapshot: &StationSnapshot) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .insert(snapshot.station_code.clone(), snapshot.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<StationSnapshot>, StoreError> {
        let mut snapshots: Vec<StationSnapshot> =
            self.inner.read().await.values().cloned().collect();
        snapshots.sort_by(|a, b| a.station_code.cmp(&b.station_code));
        Ok(snapshots)
    }
}

use std::sync::Arc;

use crate::db::{StationSnapshot, StationStore, StoreError};

/// Read-only view over the station store for the live-stations endpoint.
#[derive(Clone)]
pub struct StationService {
    store: Arc<dyn StationStore>,
}

impl StationService {
    pub fn new(store: Arc<dyn StationStore>) -> Self {
        Self { store }
    }

    pub async fn list_snapshots(&self) -> Result<Vec<StationSnapshot>, StoreError> {
        self.store.list_all().await
    }
}

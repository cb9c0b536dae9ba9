use async_trait::async_trait;

use crate::db::{StationSnapshot, StoreError};

/// Key-value view of the persistent station store.
///
/// The refresher and the read path only ever need these three operations,
/// so they are written against this trait rather than a storage engine.
/// [`crate::db::PgStationStore`] is the production implementation;
/// [`crate::db::MemoryStationStore`] backs the test suites.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Look up one snapshot by station code.
    async fn get(&self, station_code: &str) -> Result<Option<StationSnapshot>, StoreError>;

    /// Create the snapshot if absent, otherwise overwrite every field
    /// with the given values.
    async fn upsert(&self, snapshot: &StationSnapshot) -> Result<(), StoreError>;

    /// Every stored snapshot, ordered by station code.
    async fn list_all(&self) -> Result<Vec<StationSnapshot>, StoreError>;
}

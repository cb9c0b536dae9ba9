pub mod error;
pub mod memory_station_store;
pub mod models;
pub mod pg_station_store;
pub mod station_store;

pub use error::StoreError;
pub use memory_station_store::MemoryStationStore;
pub use models::StationSnapshot;
pub use pg_station_store::PgStationStore;
pub use station_store::StationStore;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{StationSnapshot, StationStore, StoreError};

#[derive(Clone)]
pub struct PgStationStore {
    pool: PgPool,
}

impl PgStationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationStore for PgStationStore {
    #[instrument(skip(self), fields(station_code = %station_code))]
    async fn get(&self, station_code: &str) -> Result<Option<StationSnapshot>, StoreError> {
        debug!("Querying station by code");

        let snapshot = sqlx::query_as::<_, StationSnapshot>(
            r#"
            SELECT station_code, station_name, state, district,
                   latitude, longitude, latest_level, latest_date
            FROM stations
            WHERE station_code = $1
            "#,
        )
        .bind(station_code)
        .fetch_optional(&self.pool)
        .await?;

        if snapshot.is_some() {
            debug!("Found station");
        } else {
            debug!("Station not found");
        }

        Ok(snapshot)
    }

    #[instrument(skip(self, snapshot), fields(station_code = %snapshot.station_code))]
    async fn upsert(&self, snapshot: &StationSnapshot) -> Result<(), StoreError> {
        debug!("Upserting station snapshot");

        sqlx::query(
            r#"
            INSERT INTO stations (
                station_code, station_name, state, district,
                latitude, longitude, latest_level, latest_date, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (station_code) DO UPDATE SET
                station_name = EXCLUDED.station_name,
                state = EXCLUDED.state,
                district = EXCLUDED.district,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                latest_level = EXCLUDED.latest_level,
                latest_date = EXCLUDED.latest_date,
                updated_at = NOW()
            "#,
        )
        .bind(&snapshot.station_code)
        .bind(&snapshot.station_name)
        .bind(&snapshot.state)
        .bind(&snapshot.district)
        .bind(snapshot.latitude)
        .bind(snapshot.longitude)
        .bind(snapshot.latest_level)
        .bind(snapshot.latest_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<StationSnapshot>, StoreError> {
        debug!("Querying all station snapshots");

        let snapshots = sqlx::query_as::<_, StationSnapshot>(
            r#"
            SELECT station_code, station_name, state, district,
                   latitude, longitude, latest_level, latest_date
            FROM stations
            ORDER BY station_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} stations", snapshots.len());
        Ok(snapshots)
    }
}

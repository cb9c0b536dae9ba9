use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::db::{StationSnapshot, StationStore, StoreError};
use crate::fetch_error::FetchError;
use crate::fetcher::{self, GroundwaterReading, RegionQuery, WrisFetcher};
use crate::location_fetcher::LocationDirectoryFetcher;

/// Start of the window used when no trailing-day count is given.
pub const HISTORICAL_START_DATE: &str = "2023-01-01";

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Failed to fetch location list: {0}")]
    LocationDirectory(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Counters for the final log line. The log stream is the operational
/// record of a run; nothing richer is reported.
#[derive(Debug, Default)]
pub struct RefreshStats {
    pub regions_processed: usize,
    pub regions_skipped: usize,
    pub stations_upserted: usize,
}

/// Date range for a refresh run: a trailing window of `days` ending today,
/// or the fixed historical start date when `days` is zero or absent.
pub fn refresh_date_range(days: Option<u32>) -> (NaiveDate, NaiveDate) {
    let end_date = Utc::now().date_naive();
    let start_date = match days {
        Some(days) if days > 0 => end_date - Duration::days(days as i64),
        _ => HISTORICAL_START_DATE.parse().unwrap(),
    };
    (start_date, end_date)
}

/// One full pass over the location directory, upserting the latest reading
/// per station into the store.
///
/// A directory fetch failure aborts the run; a single region failing only
/// skips that region. Upserts are per candidate, so partial progress
/// persists if the run is interrupted.
#[instrument(skip(wris_fetcher, location_fetcher, store))]
pub async fn run_refresh(
    wris_fetcher: &WrisFetcher,
    location_fetcher: &LocationDirectoryFetcher,
    store: &dyn StationStore,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<RefreshStats, RefreshError> {
    info!(
        "Starting station refresh for {} through {}",
        start_date, end_date
    );

    let directory = location_fetcher.fetch_directory().await?;
    let total_states = directory.states.len();
    let mut stats = RefreshStats::default();

    for (index, state_entry) in directory.states.iter().enumerate() {
        for district in &state_entry.districts {
            debug!(
                "Fetching data for {}, {} ({}/{})",
                district,
                state_entry.state,
                index + 1,
                total_states
            );

            let query = RegionQuery {
                state_name: state_entry.state.to_uppercase(),
                district_name: district.to_uppercase(),
                start_date,
                end_date,
            };

            let batch = match wris_fetcher.fetch_readings(&query).await {
                Ok(response) if !response.data.is_empty() => response.data,
                Ok(_) => {
                    warn!(
                        "Could not fetch data for {}, {}: no data returned",
                        district, state_entry.state
                    );
                    stats.regions_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(
                        "Could not fetch data for {}, {}: {}",
                        district, state_entry.state, e
                    );
                    stats.regions_skipped += 1;
                    continue;
                }
            };

            let candidates = reduce_batch(&batch, &state_entry.state, district);
            debug!(
                "Region {}, {} reduced to {} station candidates",
                district,
                state_entry.state,
                candidates.len()
            );

            for snapshot in candidates.values() {
                store.upsert(snapshot).await?;
                stats.stations_upserted += 1;
            }
            stats.regions_processed += 1;
        }
    }

    info!(
        "Finished updating station data: {} regions processed, {} skipped, {} snapshots upserted",
        stats.regions_processed, stats.regions_skipped, stats.stations_upserted
    );
    Ok(stats)
}

/// Reduce one region batch to a single snapshot candidate per station code.
///
/// Readings missing a station code, latitude, or longitude are discarded,
/// as are readings whose timestamp does not parse. For each code the
/// chronologically latest reading survives; on a timestamp tie the reading
/// encountered last wins.
fn reduce_batch(
    batch: &[GroundwaterReading],
    state_name: &str,
    district_name: &str,
) -> HashMap<String, StationSnapshot> {
    let mut candidates: HashMap<String, (NaiveDateTime, StationSnapshot)> = HashMap::new();

    for reading in batch {
        let (Some(code), Some(latitude), Some(longitude)) = (
            reading.station_code.as_deref(),
            reading.latitude,
            reading.longitude,
        ) else {
            continue;
        };
        let Some(raw_time) = reading.data_time.as_deref() else {
            continue;
        };
        let Ok(timestamp) = fetcher::parse_data_time(raw_time) else {
            continue;
        };

        let newer = candidates
            .get(code)
            .map_or(true, |&(existing, _)| timestamp >= existing);
        if newer {
            let snapshot = StationSnapshot {
                station_code: code.to_string(),
                station_name: reading
                    .station_name
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                state: reading
                    .state
                    .clone()
                    .unwrap_or_else(|| state_name.to_string()),
                district: reading
                    .district
                    .clone()
                    .unwrap_or_else(|| district_name.to_string()),
                latitude,
                longitude,
                latest_level: reading.data_value,
                latest_date: Some(timestamp),
            };
            candidates.insert(code.to_string(), (timestamp, snapshot));
        }
    }

    candidates
        .into_iter()
        .map(|(code, (_, snapshot))| (code, snapshot))
        .collect()
}

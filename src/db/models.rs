use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// The latest known reading for one monitoring station.
///
/// Created on a station's first successful refresh and overwritten in
/// place by later refresh runs; never deleted. Only the refresher writes
/// these rows, everything else reads them.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct StationSnapshot {
    pub station_code: String,
    pub station_name: String,
    pub state: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub latest_level: Option<f64>,
    pub latest_date: Option<NaiveDateTime>,
}

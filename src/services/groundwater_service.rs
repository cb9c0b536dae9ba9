use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::fetcher::{self, GroundwaterReading, RegionQuery, WrisFetcher, WrisResponse};
use crate::services::ServiceError;

pub const NO_RECORDS_MESSAGE: &str = "No records found for the given criteria.";
pub const NO_VALID_DATA_MESSAGE: &str = "No valid water level data available for processing.";

/// Inbound body shared by the three read-path endpoints. Field names match
/// the frontend contract; validation happens in [`GroundwaterRequest::to_region_query`],
/// not in the extractor, so a missing field maps to a 400 rather than a 422.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundwaterRequest {
    #[serde(rename = "stateName")]
    pub state_name: Option<String>,
    #[serde(rename = "districtName")]
    pub district_name: Option<String>,
    #[serde(rename = "startdate")]
    pub start_date: Option<String>,
    #[serde(rename = "enddate")]
    pub end_date: Option<String>,
}

impl GroundwaterRequest {
    /// Validate the request and build the upstream query. Every field is
    /// required and the dates must be `YYYY-MM-DD`; nothing is sent
    /// upstream until this has passed.
    pub fn to_region_query(&self) -> Result<RegionQuery, ServiceError> {
        let state_name = require_field(&self.state_name, "stateName")?;
        let district_name = require_field(&self.district_name, "districtName")?;
        let start_date = parse_date_field(&self.start_date, "startdate")?;
        let end_date = parse_date_field(&self.end_date, "enddate")?;

        Ok(RegionQuery {
            state_name: state_name.to_string(),
            district_name: district_name.to_string(),
            start_date,
            end_date,
        })
    }
}

fn require_field<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ServiceError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::Validation(format!("Missing required field: {name}")))
}

fn parse_date_field(value: &Option<String>, name: &str) -> Result<NaiveDate, ServiceError> {
    let raw = require_field(value, name)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ServiceError::Validation(format!("Invalid date for {name}: {e}")))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatestWaterLevel {
    pub date: String,
    pub level: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub total_record_count: usize,
    pub valid_record_count: usize,
    pub latest_water_level: LatestWaterLevel,
    pub min_level: f64,
    pub max_level: f64,
    pub average_level: f64,
    pub net_change: f64,
}

/// Outcome of the summary routine. The two message variants are data
/// conditions, not errors, and map to 200 responses.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    NoRecords,
    NoValidData,
    Summary(Summary),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub level: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendResponse {
    pub trend_data: Vec<TrendPoint>,
}

#[derive(Clone)]
pub struct GroundwaterService {
    fetcher: WrisFetcher,
}

impl GroundwaterService {
    pub fn new(fetcher: WrisFetcher) -> Self {
        Self { fetcher }
    }

    /// Pass-through: validate, fetch, return the parsed body unchanged.
    #[instrument(skip(self, request))]
    pub async fn fetch_raw(
        &self,
        request: &GroundwaterRequest,
    ) -> Result<WrisResponse, ServiceError> {
        let query = request.to_region_query()?;
        debug!("Forwarding groundwater level request to WRIS");
        Ok(self.fetcher.fetch_readings(&query).await?)
    }

    #[instrument(skip(self, request))]
    pub async fn summary(
        &self,
        request: &GroundwaterRequest,
    ) -> Result<SummaryOutcome, ServiceError> {
        let response = self.fetch_raw(request).await?;
        summarize(&response.data)
    }

    #[instrument(skip(self, request))]
    pub async fn trend(&self, request: &GroundwaterRequest) -> Result<TrendResponse, ServiceError> {
        let response = self.fetch_raw(request).await?;
        trend(&response.data)
    }
}

/// Readings with a level, paired with their parsed timestamp and sorted
/// chronologically. A reading with a level but a missing or malformed
/// timestamp is a processing failure, never silently dropped.
fn sorted_valid_readings(
    readings: &[GroundwaterReading],
) -> Result<Vec<(NaiveDateTime, f64)>, ServiceError> {
    let mut valid = Vec::new();
    for reading in readings {
        let Some(level) = reading.data_value else {
            continue;
        };
        let raw = reading.data_time.as_deref().ok_or_else(|| {
            ServiceError::Processing("reading has a dataValue but no dataTime".to_string())
        })?;
        let timestamp = fetcher::parse_data_time(raw)
            .map_err(|e| ServiceError::Processing(format!("invalid dataTime {raw:?}: {e}")))?;
        valid.push((timestamp, level));
    }
    // Stable sort keeps input order for equal timestamps.
    valid.sort_by_key(|&(timestamp, _)| timestamp);
    Ok(valid)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summarize(readings: &[GroundwaterReading]) -> Result<SummaryOutcome, ServiceError> {
    if readings.is_empty() {
        return Ok(SummaryOutcome::NoRecords);
    }

    let valid = sorted_valid_readings(readings)?;
    let (Some(&(_, earliest_level)), Some(&(latest_ts, latest_level))) =
        (valid.first(), valid.last())
    else {
        return Ok(SummaryOutcome::NoValidData);
    };

    let mut min_level = f64::INFINITY;
    let mut max_level = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &(_, level) in &valid {
        min_level = min_level.min(level);
        max_level = max_level.max(level);
        sum += level;
    }

    Ok(SummaryOutcome::Summary(Summary {
        total_record_count: readings.len(),
        valid_record_count: valid.len(),
        latest_water_level: LatestWaterLevel {
            date: latest_ts.format("%d-%m-%Y").to_string(),
            level: latest_level,
        },
        min_level,
        max_level,
        average_level: round2(sum / valid.len() as f64),
        net_change: round2(latest_level - earliest_level),
    }))
}

pub fn trend(readings: &[GroundwaterReading]) -> Result<TrendResponse, ServiceError> {
    let trend_data = sorted_valid_readings(readings)?
        .into_iter()
        .map(|(timestamp, level)| TrendPoint {
            date: timestamp.format("%d-%m-%Y").to_string(),
            level,
        })
        .collect();

    Ok(TrendResponse { trend_data })
}

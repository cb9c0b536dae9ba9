use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::fetch_error::FetchError;

/// Agency whose stations the WRIS dataset endpoint is queried for.
pub const AGENCY_NAME: &str = "CGWB";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE: u32 = 0;
const PAGE_SIZE: u32 = 1000;

/// One (state, district) pair plus the inclusive date range for a single
/// WRIS dataset call.
#[derive(Debug, Clone)]
pub struct RegionQuery {
    pub state_name: String,
    pub district_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A single reading as returned by WRIS. Every field the upstream may omit
/// is optional; fields we do not model are carried through `extra` so the
/// pass-through endpoint returns the body unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundwaterReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub data_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WrisResponse {
    #[serde(default)]
    pub data: Vec<GroundwaterReading>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parse a WRIS `dataTime` value. The upstream emits ISO-8601 without an
/// offset, sometimes with a space separator or a bare date.
pub fn parse_data_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|e| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap())
                .map_err(|_| e)
        })
}

#[derive(Clone)]
pub struct WrisFetcher {
    client: reqwest::Client,
    url: String,
}

impl WrisFetcher {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { client, url }
    }

    /// Issue one dataset request for the given region and date range.
    ///
    /// No retry is performed here; a slow upstream surfaces as
    /// [`FetchError::Timeout`] once the 30 second bound is exceeded.
    #[instrument(skip(self), fields(state = %query.state_name, district = %query.district_name))]
    pub async fn fetch_readings(&self, query: &RegionQuery) -> Result<WrisResponse, FetchError> {
        let params = [
            ("agencyName", AGENCY_NAME.to_string()),
            ("stateName", query.state_name.clone()),
            ("districtName", query.district_name.clone()),
            ("startdate", query.start_date.format("%Y-%m-%d").to_string()),
            ("enddate", query.end_date.format("%Y-%m-%d").to_string()),
            ("download", "false".to_string()),
            ("page", PAGE.to_string()),
            ("size", PAGE_SIZE.to_string()),
        ];

        debug!("Sending dataset request to WRIS");
        let response = self
            .client
            .post(&self.url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        debug!("Received WRIS response with status: {}", response.status());

        let body = response.json::<WrisResponse>().await?;
        debug!("Parsed {} readings from WRIS response", body.data.len());
        Ok(body)
    }
}

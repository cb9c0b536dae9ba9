use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::db::StationSnapshot;
use crate::fetcher::WrisResponse;
use crate::services::groundwater_service::{
    GroundwaterRequest, SummaryOutcome, TrendResponse, NO_RECORDS_MESSAGE, NO_VALID_DATA_MESSAGE,
};
use crate::services::{GroundwaterService, ServiceError, StationService};

#[derive(Clone)]
pub struct AppState {
    pub groundwater_service: GroundwaterService,
    pub station_service: StationService,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/groundwater-level", post(groundwater_level))
        .route("/groundwater-summary", post(groundwater_summary))
        .route("/water-level-trend", post(water_level_trend))
        .route("/all-stations-live", get(all_stations_live))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Processing(_) | ServiceError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[instrument(skip(state, request))]
async fn groundwater_level(
    State(state): State<AppState>,
    Json(request): Json<GroundwaterRequest>,
) -> Result<Json<WrisResponse>, ServiceError> {
    debug!("Proxying groundwater level request");
    let batch = state
        .groundwater_service
        .fetch_raw(&request)
        .await
        .map_err(|e| {
            warn!("Groundwater level request failed: {}", e);
            e
        })?;

    info!("Returning {} readings", batch.data.len());
    Ok(Json(batch))
}

#[instrument(skip(state, request))]
async fn groundwater_summary(
    State(state): State<AppState>,
    Json(request): Json<GroundwaterRequest>,
) -> Result<Response, ServiceError> {
    debug!("Computing groundwater summary");
    let outcome = state
        .groundwater_service
        .summary(&request)
        .await
        .map_err(|e| {
            warn!("Groundwater summary request failed: {}", e);
            e
        })?;

    match outcome {
        SummaryOutcome::NoRecords => {
            info!("No records found for summary request");
            Ok(Json(json!({ "message": NO_RECORDS_MESSAGE })).into_response())
        }
        SummaryOutcome::NoValidData => {
            info!("No valid water level data for summary request");
            Ok(Json(json!({ "message": NO_VALID_DATA_MESSAGE })).into_response())
        }
        SummaryOutcome::Summary(summary) => {
            info!(
                "Computed summary over {} valid of {} total readings",
                summary.valid_record_count, summary.total_record_count
            );
            Ok(Json(summary).into_response())
        }
    }
}

#[instrument(skip(state, request))]
async fn water_level_trend(
    State(state): State<AppState>,
    Json(request): Json<GroundwaterRequest>,
) -> Result<Json<TrendResponse>, ServiceError> {
    debug!("Computing water level trend");
    let response = state
        .groundwater_service
        .trend(&request)
        .await
        .map_err(|e| {
            warn!("Water level trend request failed: {}", e);
            e
        })?;

    info!("Returning {} trend points", response.trend_data.len());
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn all_stations_live(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationSnapshot>>, ServiceError> {
    debug!("Listing all station snapshots");
    let snapshots = state.station_service.list_snapshots().await.map_err(|e| {
        error!("Failed to list station snapshots: {}", e);
        ServiceError::from(e)
    })?;

    info!("Returning {} station snapshots", snapshots.len());
    Ok(Json(snapshots))
}

// API integration tests that exercise the Axum router end to end, with a
// mocked WRIS upstream and the in-memory station store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt; // For `.collect()`
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`

use groundwater_tracker_service::api::{create_router, AppState};
use groundwater_tracker_service::db::{MemoryStationStore, StationSnapshot, StationStore};
use groundwater_tracker_service::fetcher::WrisFetcher;
use groundwater_tracker_service::services::{GroundwaterService, StationService};

fn build_router(wris_url: String, store: Arc<MemoryStationStore>) -> Router {
    let app_state = AppState {
        groundwater_service: GroundwaterService::new(WrisFetcher::new(wris_url)),
        station_service: StationService::new(store),
    };
    create_router(app_state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request_body() -> Value {
    json!({
        "stateName": "Gujarat",
        "districtName": "Surat",
        "startdate": "2024-01-01",
        "enddate": "2024-02-01"
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn wris_mock(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
    server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router("http://unused".to_string(), Arc::new(MemoryStationStore::new()));

    let response = app
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_groundwater_summary_worked_example() {
    let mut server = Server::new_async().await;
    wris_mock(
        &mut server,
        r#"{ "data": [
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 5, "dataTime": "2024-01-01T00:00:00" },
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 7, "dataTime": "2024-01-02T00:00:00" }
        ] }"#,
    )
    .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-summary", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_record_count"], 2);
    assert_eq!(body["valid_record_count"], 2);
    assert_eq!(body["min_level"], 5.0);
    assert_eq!(body["max_level"], 7.0);
    assert_eq!(body["average_level"], 6.0);
    assert_eq!(body["net_change"], 2.0);
    assert_eq!(body["latest_water_level"]["level"], 7.0);
    assert_eq!(body["latest_water_level"]["date"], "02-01-2024");
}

#[tokio::test]
async fn test_groundwater_summary_no_records_message() {
    let mut server = Server::new_async().await;
    wris_mock(&mut server, r#"{ "data": [] }"#).await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-summary", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No records found for the given criteria.");
}

#[tokio::test]
async fn test_groundwater_summary_no_valid_data_message() {
    let mut server = Server::new_async().await;
    wris_mock(
        &mut server,
        r#"{ "data": [
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": null, "dataTime": "2024-01-01T00:00:00" }
        ] }"#,
    )
    .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-summary", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "No valid water level data available for processing."
    );
}

#[tokio::test]
async fn test_groundwater_summary_bad_timestamp_is_internal_error() {
    let mut server = Server::new_async().await;
    wris_mock(
        &mut server,
        r#"{ "data": [
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 5, "dataTime": "31/12/2023" }
        ] }"#,
    )
    .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-summary", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Internal server error during data processing"));
}

#[tokio::test]
async fn test_water_level_trend_sorted() {
    let mut server = Server::new_async().await;
    wris_mock(
        &mut server,
        r#"{ "data": [
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 7, "dataTime": "2024-01-02T00:00:00" },
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": null, "dataTime": "2024-01-03T00:00:00" },
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 5, "dataTime": "2024-01-01T00:00:00" }
        ] }"#,
    )
    .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/water-level-trend", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "trend_data": [
                { "date": "01-01-2024", "level": 5.0 },
                { "date": "02-01-2024", "level": 7.0 }
            ]
        })
    );
}

#[tokio::test]
async fn test_water_level_trend_empty_batch() {
    let mut server = Server::new_async().await;
    wris_mock(&mut server, r#"{ "data": [] }"#).await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/water-level-trend", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "trend_data": [] }));
}

#[tokio::test]
async fn test_groundwater_level_passes_batch_through() {
    let mut server = Server::new_async().await;
    wris_mock(
        &mut server,
        r#"{ "statusCode": 200, "message": "ok", "data": [
            { "stationCode": "A", "latitude": 21.0, "longitude": 72.0, "dataValue": 5.0, "dataTime": "2024-01-01T00:00:00" }
        ] }"#,
    )
    .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-level", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["stationCode"], "A");
    assert_eq!(body["data"][0]["dataValue"], 5.0);
    // Fields outside the reading model survive the round trip
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "ok");
}

#[tokio::test]
async fn test_missing_state_name_rejected_before_any_upstream_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let body = json!({
        "districtName": "Surat",
        "startdate": "2024-01-01",
        "enddate": "2024-02-01"
    });
    let response = app
        .oneshot(post_json("/api/v1/groundwater-level", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Missing required field: stateName");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let app = build_router(server.url(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(post_json("/api/v1/groundwater-level", request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Failed to connect to the external WRIS API"));
}

#[tokio::test]
async fn test_all_stations_live_lists_snapshots() {
    let store = Arc::new(MemoryStationStore::new());

    store
        .upsert(&StationSnapshot {
            station_code: "GW002".to_string(),
            station_name: "West Well".to_string(),
            state: "Gujarat".to_string(),
            district: "Rajkot".to_string(),
            latitude: 22.3,
            longitude: 70.8,
            latest_level: None,
            latest_date: None,
        })
        .await
        .unwrap();
    store
        .upsert(&StationSnapshot {
            station_code: "GW001".to_string(),
            station_name: "East Well".to_string(),
            state: "Gujarat".to_string(),
            district: "Surat".to_string(),
            latitude: 21.17,
            longitude: 72.83,
            latest_level: Some(5.4),
            latest_date: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0),
        })
        .await
        .unwrap();

    let app = build_router("http://unused".to_string(), store);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/all-stations-live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let stations = body.as_array().unwrap();
    assert_eq!(stations.len(), 2);

    // Ordered by station code; timestamps ISO-8601 or null
    assert_eq!(stations[0]["station_code"], "GW001");
    assert_eq!(stations[0]["station_name"], "East Well");
    assert_eq!(stations[0]["latest_level"], 5.4);
    assert_eq!(stations[0]["latest_date"], "2024-01-02T00:00:00");
    assert_eq!(stations[1]["station_code"], "GW002");
    assert!(stations[1]["latest_level"].is_null());
    assert!(stations[1]["latest_date"].is_null());
}

#[tokio::test]
async fn test_all_stations_live_empty_store() {
    let app = build_router("http://unused".to_string(), Arc::new(MemoryStationStore::new()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/all-stations-live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!([]));
}

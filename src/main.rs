use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use groundwater_tracker_service::api::{create_router, AppState};
use groundwater_tracker_service::config::Config;
use groundwater_tracker_service::db::PgStationStore;
use groundwater_tracker_service::fetcher::WrisFetcher;
use groundwater_tracker_service::services::{GroundwaterService, StationService};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,groundwater_tracker_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting groundwater tracker service with config: {:?}", config);

    // Create database connection pool
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations completed");

    // Create the station store and upstream fetcher
    let station_store = Arc::new(PgStationStore::new(pool));
    let fetcher = WrisFetcher::new(config.wris_url.clone());

    // Create services
    let groundwater_service = GroundwaterService::new(fetcher);
    let station_service = StationService::new(station_store);

    // Create API router
    let app_state = AppState {
        groundwater_service,
        station_service,
    };
    let app = create_router(app_state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

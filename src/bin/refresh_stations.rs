use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use groundwater_tracker_service::config::Config;
use groundwater_tracker_service::db::PgStationStore;
use groundwater_tracker_service::fetcher::WrisFetcher;
use groundwater_tracker_service::location_fetcher::LocationDirectoryFetcher;
use groundwater_tracker_service::refresher;

#[derive(Parser)]
#[command(name = "refresh-stations")]
#[command(about = "Fetch groundwater data for every district and update the station store", long_about = None)]
struct Cli {
    /// Number of past days to fetch; 0 means since the fixed historical start date
    #[arg(long, default_value = "0")]
    days: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,groundwater_tracker_service=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = PgStationStore::new(pool);
    let wris_fetcher = WrisFetcher::new(config.wris_url.clone());
    let location_fetcher = LocationDirectoryFetcher::new(config.locations_url.clone());

    let (start_date, end_date) = refresher::refresh_date_range((cli.days > 0).then_some(cli.days));
    info!("Starting data fetch for all stations...");

    let stats = refresher::run_refresh(
        &wris_fetcher,
        &location_fetcher,
        &store,
        start_date,
        end_date,
    )
    .await?;

    info!(
        "Successfully finished updating station data: {} snapshots upserted across {} regions ({} skipped)",
        stats.stations_upserted, stats.regions_processed, stats.regions_skipped
    );

    Ok(())
}

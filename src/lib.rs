pub mod api;
pub mod config;
pub mod db;
pub mod fetch_error;
pub mod fetcher;
pub mod location_fetcher;
pub mod refresher;
pub mod services;

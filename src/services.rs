pub mod error;
pub mod groundwater_service;
pub mod station_service;

pub use error::ServiceError;
pub use groundwater_service::GroundwaterService;
pub use station_service::StationService;

use crate::db::StoreError;
use crate::fetch_error::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("The request to the external WRIS API timed out.")]
    UpstreamTimeout,
    #[error("Failed to connect to the external WRIS API: {0}")]
    UpstreamUnavailable(String),
    #[error("Internal server error during data processing: {0}")]
    Processing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FetchError> for ServiceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => ServiceError::UpstreamTimeout,
            FetchError::Connection(detail) => ServiceError::UpstreamUnavailable(detail),
            // An undecodable body counts as the upstream being unusable
            FetchError::Decode(detail) => ServiceError::UpstreamUnavailable(detail),
        }
    }
}

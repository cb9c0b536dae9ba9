#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("The request to the external WRIS API timed out.")]
    Timeout,
    #[error("Failed to connect to the external WRIS API: {0}")]
    Connection(String),
    #[error("Failed to decode WRIS response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Connection(err.to_string())
        }
    }
}

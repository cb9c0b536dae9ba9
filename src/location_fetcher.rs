use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::fetch_error::FetchError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The static states-and-districts document driving a refresh run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDirectory {
    pub states: Vec<StateDistricts>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDistricts {
    pub state: String,
    pub districts: Vec<String>,
}

#[derive(Clone)]
pub struct LocationDirectoryFetcher {
    client: reqwest::Client,
    url: String,
}

impl LocationDirectoryFetcher {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { client, url }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_directory(&self) -> Result<LocationDirectory, FetchError> {
        debug!("Fetching location directory");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        debug!("Received directory response with status: {}", response.status());

        let directory = response.json::<LocationDirectory>().await?;
        debug!("Directory lists {} states", directory.states.len());
        Ok(directory)
    }
}

use crate::data_structures::{SharedTracker, TrackerSeries};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tracker endpoint responded with {0}")]
    Status(StatusCode),
    #[error("invalid tracker payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// HTTP client for the performance tracker endpoint.
#[derive(Clone, Debug)]
pub struct TrackerClient {
    client: Client,
    endpoint: String,
}

impl TrackerClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TrackerError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(TrackerClient {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self) -> Result<TrackerSeries, TrackerError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status(status));
        }

        let body = response.text().await?;
        let series: TrackerSeries = serde_json::from_str(&body)?;
        Ok(series)
    }
}

/// Fetch the tracker series once and replace `tracker` with it.
///
/// Failures are logged and leave the previous series in place.
#[instrument(skip(client, tracker), fields(endpoint = %client.endpoint()))]
pub async fn refresh(client: TrackerClient, tracker: SharedTracker) {
    debug!("Fetching tracker data");

    match client.fetch().await {
        Ok(series) => {
            let point_count = series.len();
            *tracker.lock().await = series;
            info!(point_count, "Updated tracker data");
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch tracker data, keeping previous series");
        }
    }
}

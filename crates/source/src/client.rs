//! HTTP client for the Transnet eTenders portal.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use tender_core::config::SourceConfig;

use crate::error::SourceError;

/// The portal rejects requests without a browser-like User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// The portal wraps the listing in an object under a `result` key;
/// a missing key means an empty listing.
#[derive(Deserialize)]
struct ListingResponse {
    #[serde(default)]
    result: Vec<Value>,
}

/// Fetches the currently advertised tender listing.
pub struct TransnetClient {
    client: reqwest::Client,
    api_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl TransnetClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            attempts: config.attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        })
    }

    /// Fetch the raw tender listing from the portal.
    ///
    /// Non-2xx responses and undecodable bodies are fetch failures; after
    /// the configured attempts are exhausted the last error is returned.
    pub async fn fetch_advertised(&self) -> Result<Vec<Value>, SourceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(items) => {
                    info!(count = items.len(), "Fetched tender listing");
                    return Ok(items);
                }
                Err(e) if attempt < self.attempts => {
                    warn!(attempt, error = %e, "Tender listing fetch failed; retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self) -> Result<Vec<Value>, SourceError> {
        let response = self
            .client
            .get(&self.api_url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                code: status.as_u16(),
            });
        }

        let listing: ListingResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(format!("invalid JSON from source API: {e}")))?;

        Ok(listing.result)
    }
}

//! HTTP client for the external song lookup service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use super::{EnrichmentError, SongEnricher, SongEnrichment};

/// Queries `GET <base_url>?group=<group>&song=<title>`.
pub struct LyricsApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl LyricsApiClient {
    /// Create a new lookup client.
    ///
    /// # Arguments
    /// * `base_url` - Full URL of the lookup endpoint (e.g., "http://localhost:8081/info")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SongEnricher for LyricsApiClient {
    async fn fetch(&self, title: &str, group: &str) -> Result<SongEnrichment, EnrichmentError> {
        debug!("Fetching enrichment for {:?} by {:?}", title, group);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .map_err(|err| {
                warn!("Lookup service request failed: {}", err);
                EnrichmentError::Unreachable(err.to_string())
            })?;

        if response.status() != StatusCode::OK {
            warn!("Lookup service returned status {}", response.status());
            return Err(EnrichmentError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| EnrichmentError::Unreachable(err.to_string()))?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!("Lookup service returned an invalid body: {}", err);
            EnrichmentError::Decode(err.to_string())
        })
    }
}

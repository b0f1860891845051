//! Enrichment of songs with release date, lyrics and link from an external
//! lookup service.

mod client;

pub use client::LyricsApiClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Metadata returned by the lookup service for a song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SongEnrichment {
    #[serde(alias = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Error connecting to external API: {0}")]
    Unreachable(String),

    #[error("External API returned status code: {0}")]
    UnexpectedStatus(u16),

    #[error("Error decoding API response: {0}")]
    Decode(String),
}

/// Source of song enrichment data. A single attempt is made per call.
#[async_trait]
pub trait SongEnricher: Send + Sync {
    async fn fetch(&self, title: &str, group: &str) -> Result<SongEnrichment, EnrichmentError>;
}

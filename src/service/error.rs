use crate::enrichment::EnrichmentError;
use thiserror::Error;

/// Outcome of a failed song operation. Translated to HTTP by the server.
#[derive(Debug, Error)]
pub enum SongServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] EnrichmentError),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for SongServiceError {
    fn from(err: anyhow::Error) -> Self {
        SongServiceError::Storage(err)
    }
}

pub type ServiceResult<T> = Result<T, SongServiceError>;

//! Movie metadata lookups.
//!
//! The classifier only needs one fact from a metadata service: the release
//! year of the movie with a given title. Every failure (not found, bad
//! response, network error) is reported as an error and treated by the
//! classifier as "not a movie".

mod omdb;
mod tmdb;

pub use omdb::{OmdbClient, OmdbConfig};
pub use tmdb::{TmdbClient, TmdbConfig};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{MetadataBackend, MetadataConfig};

/// Errors that can occur when querying a metadata service.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// No movie with that title.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The year field was present but not a plain year (e.g. "2009–2023").
    #[error("Malformed year: {0:?}")]
    MalformedYear(String),

    /// Lookup not configured (missing API key, backend disabled).
    #[error("Lookup not configured: {0}")]
    NotConfigured(String),
}

/// A service that knows movie release years.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Looks up the release year of the movie titled exactly `title`.
    async fn release_year(&self, title: &str) -> Result<u32, MetadataError>;
}

/// Backend used when no metadata service is configured.
#[derive(Debug, Default, Clone)]
pub struct DisabledLookup;

#[async_trait]
impl MetadataLookup for DisabledLookup {
    fn name(&self) -> &str {
        "none"
    }

    async fn release_year(&self, _title: &str) -> Result<u32, MetadataError> {
        Err(MetadataError::NotConfigured(
            "no metadata backend selected".to_string(),
        ))
    }
}

/// Builds the lookup selected by the configuration.
pub fn create_metadata_lookup(
    config: &MetadataConfig,
) -> Result<Arc<dyn MetadataLookup>, MetadataError> {
    let timeout = Duration::from_secs(u64::from(config.timeout_secs));

    match config.backend {
        MetadataBackend::Omdb => {
            let omdb = config.omdb.clone().ok_or_else(|| {
                MetadataError::NotConfigured("[metadata.omdb] section missing".to_string())
            })?;
            Ok(Arc::new(OmdbClient::new(omdb, timeout)?))
        }
        MetadataBackend::Tmdb => {
            let tmdb = config.tmdb.clone().ok_or_else(|| {
                MetadataError::NotConfigured("[metadata.tmdb] section missing".to_string())
            })?;
            Ok(Arc::new(TmdbClient::new(tmdb, timeout)?))
        }
        MetadataBackend::None => Ok(Arc::new(DisabledLookup)),
    }
}

/// Parses a year field that must be exactly four digits.
pub(crate) fn parse_year(raw: &str) -> Result<u32, MetadataError> {
    let trimmed = raw.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        trimmed
            .parse()
            .map_err(|_| MetadataError::MalformedYear(raw.to_string()))
    } else {
        Err(MetadataError::MalformedYear(raw.to_string()))
    }
}

//! OMDb (Open Movie Database) client.
//!
//! Lookups are by exact title (`?t=`); OMDb answers HTTP 200 with
//! `"Response": "False"` when nothing matches.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_year, MetadataError, MetadataLookup};

/// OMDb client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required). `OMDBAPI_KEY` in the environment also works.
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig, timeout: Duration) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://www.omdbapi.com/".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn release_year(&self, title: &str) -> Result<u32, MetadataError> {
        debug!("OMDb title lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(MetadataError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed = parse_response(&body)?;
        year_from_response(title, parsed)
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbTitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn parse_response(body: &str) -> Result<OmdbTitleResponse, MetadataError> {
    serde_json::from_str(body).map_err(|e| {
        MetadataError::ParseError(format!("Failed to parse OMDb title response: {}", e))
    })
}

fn year_from_response(title: &str, response: OmdbTitleResponse) -> Result<u32, MetadataError> {
    if !response.response.eq_ignore_ascii_case("true") {
        let reason = response.error.unwrap_or_else(|| "no match".to_string());
        return Err(MetadataError::NotFound(format!("{}: {}", title, reason)));
    }

    match response.year {
        Some(year) => parse_year(&year),
        None => Err(MetadataError::MalformedYear(String::new())),
    }
}

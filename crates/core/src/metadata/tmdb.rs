//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_year, MetadataError, MetadataLookup};

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig, timeout: Duration) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Search for movies by query.
    async fn search_movies(&self, query: &str) -> Result<Vec<TmdbMovieResult>, MetadataError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
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

        let search_result: TmdbSearchResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse movie search response: {}", e))
        })?;

        Ok(search_result.results)
    }
}

#[async_trait]
impl MetadataLookup for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn release_year(&self, title: &str) -> Result<u32, MetadataError> {
        let results = self.search_movies(title).await?;
        first_result_year(title, &results)
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbMovieResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    title: String,
    release_date: Option<String>,
}

/// Year of the best (first) search hit, taken from `YYYY-MM-DD`.
fn first_result_year(title: &str, results: &[TmdbMovieResult]) -> Result<u32, MetadataError> {
    let first = results
        .first()
        .ok_or_else(|| MetadataError::NotFound(title.to_string()))?;

    debug!("TMDB best match for '{}': '{}'", title, first.title);

    let date = first.release_date.as_deref().unwrap_or_default();
    parse_year(date.get(..4).unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, release_date: Option<&str>) -> TmdbMovieResult {
        TmdbMovieResult {
            title: title.to_string(),
            release_date: release_date.map(str::to_string),
        }
    }

    #[test]
    fn test_search_response_parses() {
        let body = r#"{"page":1,"results":[{"id":27205,"title":"Inception","release_date":"2010-07-15"}]}"#;
        let response: TmdbSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(first_result_year("Inception", &response.results).unwrap(), 2010);
    }

    #[test]
    fn test_first_result_wins() {
        let results = vec![
            result("The Matrix", Some("1999-03-30")),
            result("The Matrix Reloaded", Some("2003-05-15")),
        ];
        assert_eq!(first_result_year("The Matrix", &results).unwrap(), 1999);
    }

    #[test]
    fn test_no_results_is_not_found() {
        assert!(matches!(
            first_result_year("Nothing", &[]),
            Err(MetadataError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_release_date_is_malformed() {
        let results = vec![result("Unreleased", None), result("Other", Some(""))];
        assert!(matches!(
            first_result_year("Unreleased", &results),
            Err(MetadataError::MalformedYear(_))
        ));
    }
}

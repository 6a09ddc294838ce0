//! Mock metadata lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, MetadataLookup};

/// Mock implementation of the MetadataLookup trait.
///
/// Titles are matched case-insensitively, like OMDb's `t=` parameter.
/// Clones share state, so a test can keep a handle after giving one to a
/// classifier.
///
/// # Example
///
/// ```rust,ignore
/// use movemedia_core::testing::MockMetadataLookup;
///
/// let lookup = MockMetadataLookup::new();
/// lookup.add_movie("Inception", 2010).await;
///
/// assert_eq!(lookup.release_year("inception").await?, 2010);
/// assert_eq!(lookup.query_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockMetadataLookup {
    /// Known movies by lowercased title.
    movies: Arc<RwLock<HashMap<String, u32>>>,
    /// Titles queried, in order.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl MockMetadataLookup {
    /// Create a new mock lookup with no known movies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a movie and its release year.
    pub async fn add_movie(&self, title: &str, year: u32) {
        self.movies.write().await.insert(title.to_lowercase(), year);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// Titles queried so far.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of lookups performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl MetadataLookup for MockMetadataLookup {
    fn name(&self) -> &str {
        "mock"
    }

    async fn release_year(&self, title: &str) -> Result<u32, MetadataError> {
        self.queries.write().await.push(title.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.movies
            .read()
            .await
            .get(&title.to_lowercase())
            .copied()
            .ok_or_else(|| MetadataError::NotFound(title.to_string()))
    }
}

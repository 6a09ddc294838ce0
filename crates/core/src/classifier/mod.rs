//! Classifier: decides whether a file is a movie or a TV episode.
//!
//! The tests run in a fixed order:
//!
//! 1. **Movie**: the name carries a title and a year, and the metadata
//!    service confirms that a movie with that exact title came out that year.
//!    Lookup failures of any kind make the test fail; they are not errors.
//! 2. **TV**: the name carries a title, a season and an episode. Titles in
//!    the known-TV list are accepted without season/episode tokens.
//! 3. Otherwise the file is unclassified.
//!
//! The override table is consulted by the router before classification and
//! is not part of this module.

mod types;

pub use types::{title_case, ClassificationResult, EpisodeId, SeasonId};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::metadata::MetadataLookup;
use crate::parser::{ParsedName, ReleaseNameParser};

/// Filename classifier.
pub struct Classifier {
    parser: Arc<dyn ReleaseNameParser>,
    metadata: Arc<dyn MetadataLookup>,
    known_tv_titles: HashSet<String>,
}

impl Classifier {
    /// Creates a classifier. `known_tv_titles` are compared lowercase.
    pub fn new(
        parser: Arc<dyn ReleaseNameParser>,
        metadata: Arc<dyn MetadataLookup>,
        known_tv_titles: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            parser,
            metadata,
            known_tv_titles: known_tv_titles
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Classifies a bare file name.
    pub async fn classify(&self, file_name: &str) -> ClassificationResult {
        let parsed = self.parser.parse(file_name);
        debug!("Parsed '{}': {:?}", file_name, parsed);

        if let Some(movie) = self.movie_test(&parsed).await {
            return movie;
        }

        if let Some(episode) = self.tv_test(&parsed) {
            return episode;
        }

        ClassificationResult::Unclassified
    }

    async fn movie_test(&self, parsed: &ParsedName) -> Option<ClassificationResult> {
        let (title, year) = match (&parsed.title, parsed.year) {
            (Some(title), Some(year)) => (title, year),
            _ => return None,
        };

        match self.metadata.release_year(title).await {
            Ok(confirmed) if confirmed == year => Some(ClassificationResult::Movie {
                title: title.clone(),
                year,
            }),
            Ok(confirmed) => {
                debug!(
                    "{} says '{}' is from {}, name says {}",
                    self.metadata.name(),
                    title,
                    confirmed,
                    year
                );
                None
            }
            Err(e) => {
                debug!("{} lookup for '{}' failed: {}", self.metadata.name(), title, e);
                None
            }
        }
    }

    fn tv_test(&self, parsed: &ParsedName) -> Option<ClassificationResult> {
        let title = parsed.title.as_ref()?;

        let (season, episode) = if self.known_tv_titles.contains(&title.to_lowercase()) {
            (
                parsed.season.map_or(SeasonId::NoSeason, SeasonId::Number),
                EpisodeId::from_numbers(&parsed.episodes),
            )
        } else {
            let season = parsed.season?;
            if parsed.episodes.is_empty() {
                return None;
            }
            (
                SeasonId::Number(season),
                EpisodeId::from_numbers(&parsed.episodes),
            )
        };

        Some(ClassificationResult::Episode {
            title: title_case(title),
            season,
            episode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataError;
    use crate::parser::SceneNameParser;
    use crate::testing::MockMetadataLookup;

    fn classifier(lookup: &MockMetadataLookup, known: &[&str]) -> Classifier {
        Classifier::new(
            Arc::new(SceneNameParser::new()),
            Arc::new(lookup.clone()),
            known.iter().map(|t| t.to_string()),
        )
    }

    #[tokio::test]
    async fn test_confirmed_movie() {
        let lookup = MockMetadataLookup::new();
        lookup.add_movie("Inception", 2010).await;

        let result = classifier(&lookup, &[])
            .classify("Inception.2010.1080p.mkv")
            .await;
        assert_eq!(
            result,
            ClassificationResult::Movie {
                title: "Inception".to_string(),
                year: 2010
            }
        );
        assert_eq!(lookup.recorded_queries().await, vec!["Inception"]);
    }

    #[tokio::test]
    async fn test_year_mismatch_is_not_movie() {
        let lookup = MockMetadataLookup::new();
        lookup.add_movie("Inception", 2011).await;

        let result = classifier(&lookup, &[])
            .classify("Inception.2010.1080p.mkv")
            .await;
        assert_eq!(result, ClassificationResult::Unclassified);
    }

    #[tokio::test]
    async fn test_lookup_error_falls_through_to_tv() {
        let lookup = MockMetadataLookup::new();
        lookup
            .set_next_error(MetadataError::RateLimitExceeded)
            .await;

        let result = classifier(&lookup, &[])
            .classify("Archer.2009.S01E01.mkv")
            .await;
        assert_eq!(
            result,
            ClassificationResult::Episode {
                title: "Archer".to_string(),
                season: SeasonId::Number(1),
                episode: EpisodeId::Number(1),
            }
        );
    }

    #[tokio::test]
    async fn test_episode_without_year_skips_lookup() {
        let lookup = MockMetadataLookup::new();

        let result = classifier(&lookup, &[])
            .classify("random.show.S02E05.mkv")
            .await;
        assert_eq!(
            result,
            ClassificationResult::Episode {
                title: "Random Show".to_string(),
                season: SeasonId::Number(2),
                episode: EpisodeId::Number(5),
            }
        );
        assert_eq!(lookup.query_count().await, 0);
    }

    #[tokio::test]
    async fn test_season_without_episode_is_unclassified() {
        let lookup = MockMetadataLookup::new();

        let result = classifier(&lookup, &[])
            .classify("Random.Show.S02.Complete.mkv")
            .await;
        assert_eq!(result, ClassificationResult::Unclassified);
    }

    #[tokio::test]
    async fn test_known_tv_title_gets_sentinels() {
        let lookup = MockMetadataLookup::new();

        let result = classifier(&lookup, &["the daily show"])
            .classify("The.Daily.Show.2019.03.12.Guest.Name.720p.WEB.mkv")
            .await;
        assert_eq!(
            result,
            ClassificationResult::Episode {
                title: "The Daily Show".to_string(),
                season: SeasonId::NoSeason,
                episode: EpisodeId::NoEpisode,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_show_without_tokens_is_unclassified() {
        let lookup = MockMetadataLookup::new();

        let result = classifier(&lookup, &["the daily show"])
            .classify("The.Tonight.Show.2019.03.12.mkv")
            .await;
        assert_eq!(result, ClassificationResult::Unclassified);
    }

    #[tokio::test]
    async fn test_no_title_is_unclassified() {
        let lookup = MockMetadataLookup::new();

        let result = classifier(&lookup, &[]).classify("S01E01.mkv").await;
        assert_eq!(result, ClassificationResult::Unclassified);
    }
}

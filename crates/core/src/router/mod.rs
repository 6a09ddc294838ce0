//! Router: picks the destination directory for a file.
//!
//! Routing happens in two steps so that the override table can short-circuit
//! classification entirely:
//!
//! - [`Router::route_override`] matches the bare file name against the
//!   override table. A match is final.
//! - [`Router::route`] maps a [`ClassificationResult`] to a directory:
//!   movies go to `<movies>/<Title.Year>`, episodes to `<tv>/<Title Cased>`
//!   unless the same episode was already routed in this run.

mod memo;
mod overrides;

pub use memo::{DedupMemo, RoutedEpisodeKey};
pub use overrides::{LocationOverride, LocationOverrides};

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::classifier::ClassificationResult;
use crate::config::Config;

/// Errors raised while routing.
#[derive(Debug, Error)]
pub enum RouteError {
    /// An override pattern does not compile.
    #[error("Invalid override pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An override destination is not an existing directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Which rule produced a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Override,
    Movie,
    Episode,
}

/// Directory a file should be moved into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub kind: DestinationKind,
}

/// Why a classified file has nowhere to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDestinationReason {
    Unclassified,
    /// A sibling file with the same episode was routed earlier in this run.
    AlreadyRouted(RoutedEpisodeKey),
}

impl fmt::Display for NoDestinationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDestinationReason::Unclassified => f.write_str("not recognised as movie or episode"),
            NoDestinationReason::AlreadyRouted(key) => write!(
                f,
                "'{}' {}{} already handled in this run",
                key.title, key.season, key.episode
            ),
        }
    }
}

/// Outcome of routing a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Destination(Destination),
    NoDestination(NoDestinationReason),
}

/// Destination router.
#[derive(Debug, Clone)]
pub struct Router {
    overrides: LocationOverrides,
    movie_root: PathBuf,
    tv_root: PathBuf,
}

impl Router {
    pub fn new(
        overrides: LocationOverrides,
        movie_root: impl Into<PathBuf>,
        tv_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            overrides,
            movie_root: movie_root.into(),
            tv_root: tv_root.into(),
        }
    }

    /// Builds a router from the library roots and the override table.
    pub fn from_config(config: &Config) -> Result<Self, RouteError> {
        Ok(Self::new(
            LocationOverrides::from_config(&config.overrides)?,
            config.library.movies.clone(),
            config.library.tv.clone(),
        ))
    }

    /// Checks the override table. `Ok(None)` means no pattern matched.
    pub fn route_override(&self, file_name: &str) -> Result<Option<Destination>, RouteError> {
        let Some(entry) = self.overrides.find(file_name) else {
            return Ok(None);
        };

        let path = entry.destination();
        if !path.is_dir() {
            return Err(RouteError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        debug!("'{}' matched override -> {}", file_name, path.display());
        Ok(Some(Destination {
            path: path.to_path_buf(),
            kind: DestinationKind::Override,
        }))
    }

    /// Maps a classification to a destination, consulting and updating `memo`.
    pub fn route(&self, classification: &ClassificationResult, memo: &mut DedupMemo) -> RouteDecision {
        match classification {
            ClassificationResult::Movie { title, year } => RouteDecision::Destination(Destination {
                path: self.movie_root.join(movie_dir_name(title, *year)),
                kind: DestinationKind::Movie,
            }),
            ClassificationResult::Episode {
                title,
                season,
                episode,
            } => {
                let key = RoutedEpisodeKey {
                    title: title.clone(),
                    season: *season,
                    episode: episode.clone(),
                };
                if memo.contains(&key) {
                    return RouteDecision::NoDestination(NoDestinationReason::AlreadyRouted(key));
                }
                memo.insert(key);

                RouteDecision::Destination(Destination {
                    path: self.tv_root.join(sanitize_component(title)),
                    kind: DestinationKind::Episode,
                })
            }
            ClassificationResult::Unclassified => {
                RouteDecision::NoDestination(NoDestinationReason::Unclassified)
            }
        }
    }
}

/// `"The Matrix", 1999` → `"The.Matrix.1999"`.
pub fn movie_dir_name(title: &str, year: u32) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(sanitize_component)
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        year.to_string()
    } else {
        format!("{}.{}", words.join("."), year)
    }
}

/// Removes characters that cannot appear in a directory name on common filesystems.
fn sanitize_component(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{EpisodeId, SeasonId};
    use tempfile::TempDir;

    fn episode(title: &str, season: u32, episode: u32) -> ClassificationResult {
        ClassificationResult::Episode {
            title: title.to_string(),
            season: SeasonId::Number(season),
            episode: EpisodeId::Number(episode),
        }
    }

    #[test]
    fn test_movie_dir_name() {
        assert_eq!(movie_dir_name("Inception", 2010), "Inception.2010");
        assert_eq!(movie_dir_name("The Matrix", 1999), "The.Matrix.1999");
        assert_eq!(
            movie_dir_name("Mission: Impossible", 1996),
            "Mission.Impossible.1996"
        );
        assert_eq!(movie_dir_name("AC/DC Live", 1991), "ACDC.Live.1991");
    }

    #[test]
    fn test_route_movie() {
        let router = Router::new(LocationOverrides::default(), "/media/Movies", "/media/TV");
        let mut memo = DedupMemo::new();

        let decision = router.route(
            &ClassificationResult::Movie {
                title: "Inception".to_string(),
                year: 2010,
            },
            &mut memo,
        );
        assert_eq!(
            decision,
            RouteDecision::Destination(Destination {
                path: PathBuf::from("/media/Movies/Inception.2010"),
                kind: DestinationKind::Movie,
            })
        );
        assert!(memo.is_empty());
    }

    #[test]
    fn test_route_episode_dedups_within_memo() {
        let router = Router::new(LocationOverrides::default(), "/media/Movies", "/media/TV");
        let mut memo = DedupMemo::new();

        let first = router.route(&episode("Random Show", 2, 5), &mut memo);
        assert_eq!(
            first,
            RouteDecision::Destination(Destination {
                path: PathBuf::from("/media/TV/Random Show"),
                kind: DestinationKind::Episode,
            })
        );

        let second = router.route(&episode("Random Show", 2, 5), &mut memo);
        assert!(matches!(
            second,
            RouteDecision::NoDestination(NoDestinationReason::AlreadyRouted(_))
        ));

        let other = router.route(&episode("Random Show", 2, 6), &mut memo);
        assert!(matches!(other, RouteDecision::Destination(_)));

        // A fresh memo (new run) routes it again.
        let mut next_run = DedupMemo::new();
        let again = router.route(&episode("Random Show", 2, 5), &mut next_run);
        assert!(matches!(again, RouteDecision::Destination(_)));
    }

    #[test]
    fn test_route_unclassified() {
        let router = Router::new(LocationOverrides::default(), "/media/Movies", "/media/TV");
        let mut memo = DedupMemo::new();
        assert_eq!(
            router.route(&ClassificationResult::Unclassified, &mut memo),
            RouteDecision::NoDestination(NoDestinationReason::Unclassified)
        );
    }

    #[test]
    fn test_route_override_existing_directory() {
        let temp = TempDir::new().unwrap();
        let archer = temp.path().join("TV/Archer (2009)");
        std::fs::create_dir_all(&archer).unwrap();

        let overrides =
            LocationOverrides::new(vec![LocationOverride::new(r"^archer[\W]", &archer).unwrap()]);
        let router = Router::new(overrides, "/media/Movies", "/media/TV");

        let destination = router
            .route_override("Archer.2009.S01E01.mkv")
            .unwrap()
            .unwrap();
        assert_eq!(destination.path, archer);
        assert_eq!(destination.kind, DestinationKind::Override);

        assert!(router.route_override("Random.Show.S02E05.mkv").unwrap().is_none());
    }

    #[test]
    fn test_route_override_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("TV/Archer (2009)");

        let overrides =
            LocationOverrides::new(vec![LocationOverride::new(r"^archer[\W]", &missing).unwrap()]);
        let router = Router::new(overrides, "/media/Movies", "/media/TV");

        let result = router.route_override("Archer.2009.S01E01.mkv");
        assert!(matches!(result, Err(RouteError::NotADirectory { .. })));
    }
}

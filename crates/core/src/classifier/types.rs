//! Classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Season of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonId {
    Number(u32),
    /// The show's file names carry no season (known TV titles only).
    NoSeason,
}

/// Episode(s) contained in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeId {
    Number(u32),
    /// Multi-episode file, e.g. `S01E01E02`.
    Multi(Vec<u32>),
    /// The show's file names carry no episode (known TV titles only).
    NoEpisode,
}

impl EpisodeId {
    /// Builds the identifier from parsed episode numbers.
    pub fn from_numbers(numbers: &[u32]) -> Self {
        match numbers {
            [] => EpisodeId::NoEpisode,
            [single] => EpisodeId::Number(*single),
            many => EpisodeId::Multi(many.to_vec()),
        }
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonId::Number(n) => write!(f, "S{:02}", n),
            SeasonId::NoSeason => f.write_str("S??"),
        }
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeId::Number(n) => write!(f, "E{:02}", n),
            EpisodeId::Multi(numbers) => {
                for n in numbers {
                    write!(f, "E{:02}", n)?;
                }
                Ok(())
            }
            EpisodeId::NoEpisode => f.write_str("E??"),
        }
    }
}

/// What a file turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassificationResult {
    Movie {
        title: String,
        year: u32,
    },
    Episode {
        /// Title-cased show title.
        title: String,
        season: SeasonId,
        episode: EpisodeId,
    },
    Unclassified,
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationResult::Movie { title, year } => write!(f, "movie '{}' ({})", title, year),
            ClassificationResult::Episode {
                title,
                season,
                episode,
            } => write!(f, "episode '{}' {}{}", title, season, episode),
            ClassificationResult::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// Python-style title case: first letter of every alphabetic run upper, rest lower.
///
/// `"random show"` → `"Random Show"`, `"the o'neills"` → `"The O'Neills"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("random show"), "Random Show");
        assert_eq!(title_case("THE DAILY SHOW"), "The Daily Show");
        assert_eq!(title_case("the o'neills"), "The O'Neills");
        assert_eq!(title_case("9-1-1 lone star"), "9-1-1 Lone Star");
    }

    #[test]
    fn test_episode_id_from_numbers() {
        assert_eq!(EpisodeId::from_numbers(&[]), EpisodeId::NoEpisode);
        assert_eq!(EpisodeId::from_numbers(&[5]), EpisodeId::Number(5));
        assert_eq!(EpisodeId::from_numbers(&[1, 2]), EpisodeId::Multi(vec![1, 2]));
    }

    #[test]
    fn test_display() {
        let episode = ClassificationResult::Episode {
            title: "Random Show".to_string(),
            season: SeasonId::Number(2),
            episode: EpisodeId::Multi(vec![5, 6]),
        };
        assert_eq!(episode.to_string(), "episode 'Random Show' S02E05E06");
        assert_eq!(
            ClassificationResult::Movie {
                title: "Inception".to_string(),
                year: 2010
            }
            .to_string(),
            "movie 'Inception' (2010)"
        );
    }
}

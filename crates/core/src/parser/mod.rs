//! Release-name parsing.
//!
//! Turns a scene-style file name such as `Random.Show.S02E05.720p.WEB.x264-GRP.mkv`
//! into loose tokens. Every token is optional: what comes out depends on what
//! the name happens to carry. The classifier decides what the tokens mean.

mod scene;

pub use scene::SceneNameParser;

use serde::{Deserialize, Serialize};

/// Tokens extracted from a release name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Title with separators replaced by spaces.
    pub title: Option<String>,
    /// Release year.
    pub year: Option<u32>,
    /// Season number.
    pub season: Option<u32>,
    /// Episode numbers; more than one for multi-episode files.
    #[serde(default)]
    pub episodes: Vec<u32>,
    /// Resolution such as `1080p`.
    pub resolution: Option<String>,
    /// Remaining recognised tokens (source, codec, release group, ...).
    #[serde(default)]
    pub extras: Vec<String>,
}

/// A best-effort release-name parser.
pub trait ReleaseNameParser: Send + Sync {
    /// Parses a bare file name (extension included or not).
    fn parse(&self, file_name: &str) -> ParsedName;
}

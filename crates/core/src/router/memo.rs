//! Run-scoped memo of routed episodes.

use std::collections::HashSet;

use crate::classifier::{EpisodeId, SeasonId};

/// (title, season, episode) of an episode already routed in this run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutedEpisodeKey {
    pub title: String,
    pub season: SeasonId,
    pub episode: EpisodeId,
}

/// Episodes routed so far in one pipeline run.
///
/// Alternate-quality copies of the same episode (`S02E05.mkv`,
/// `S02E05.720p.mkv`) only route the first one seen.
#[derive(Debug, Default)]
pub struct DedupMemo {
    routed: HashSet<RoutedEpisodeKey>,
}

impl DedupMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`; returns false if it was already present.
    pub fn insert(&mut self, key: RoutedEpisodeKey) -> bool {
        self.routed.insert(key)
    }

    pub fn contains(&self, key: &RoutedEpisodeKey) -> bool {
        self.routed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.routed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routed.is_empty()
    }
}

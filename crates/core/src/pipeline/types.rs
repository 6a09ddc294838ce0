//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Moved (or, in a dry run, would have been moved) to `destination`.
    Moved { destination: PathBuf },
    /// Nowhere to put it: unclassified, a duplicate episode in this run, or a
    /// broken override destination.
    NoDestination { reason: String },
    /// The move itself failed.
    Failed { reason: String },
}

/// Per-file line of a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    /// Source path.
    pub path: PathBuf,
    pub outcome: ItemOutcome,
}

/// Aggregate result of one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Candidates yielded by the enumerator.
    pub examined: usize,
    /// Candidates skipped because the ledger already had them.
    pub already_processed: usize,
    pub moved: usize,
    pub failed: usize,
    pub no_destination: usize,
    /// One entry per attempted file, in processing order.
    pub reports: Vec<ItemReport>,
}

impl RunSummary {
    /// Records the outcome for an attempted file.
    pub fn record(&mut self, path: PathBuf, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Moved { .. } => self.moved += 1,
            ItemOutcome::NoDestination { .. } => self.no_destination += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
        self.reports.push(ItemReport { path, outcome });
    }

    /// Whether at least one file was moved. Drives the exit status.
    pub fn anything_moved(&self) -> bool {
        self.moved > 0
    }

    /// Number of files attempted (not skipped by the ledger).
    pub fn attempted(&self) -> usize {
        self.reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::default();
        assert!(!summary.anything_moved());

        summary.record(
            PathBuf::from("/dl/a.mkv"),
            ItemOutcome::NoDestination {
                reason: "unclassified".to_string(),
            },
        );
        summary.record(
            PathBuf::from("/dl/b.mkv"),
            ItemOutcome::Failed {
                reason: "exists".to_string(),
            },
        );
        assert!(!summary.anything_moved());

        summary.record(
            PathBuf::from("/dl/c.mkv"),
            ItemOutcome::Moved {
                destination: PathBuf::from("/tv/C/c.mkv"),
            },
        );
        assert!(summary.anything_moved());
        assert_eq!(
            (summary.moved, summary.failed, summary.no_destination),
            (1, 1, 1)
        );
        assert_eq!(summary.attempted(), 3);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ItemOutcome::Moved {
            destination: PathBuf::from("/movies/Inception.2010/Inception.2010.mkv"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "moved");
        assert_eq!(
            json["destination"],
            "/movies/Inception.2010/Inception.2010.mkv"
        );
    }
}

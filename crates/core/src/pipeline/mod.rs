//! Pipeline driver: one batch pass over the source directory.
//!
//! For every candidate file, in enumeration order:
//!
//! 1. skip it if the ledger already has it;
//! 2. route it through the override table, or classify and route it;
//! 3. move it;
//! 4. record it in the ledger, whatever the outcome.
//!
//! Items are processed one at a time. The episode memo lives for exactly one
//! [`MediaPipeline::run`].

mod types;

pub use types::{ItemOutcome, ItemReport, RunSummary};

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::ledger::{Ledger, LedgerError};
use crate::placer::{Placer, PlacerError};
use crate::router::{DedupMemo, RouteDecision, Router};
use crate::source::{CandidateFile, SourceEnumerator};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ledger could not be read or appended to.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The placer is not usable.
    #[error("Placer '{name}' is not ready: {source}")]
    PlacerNotReady {
        name: String,
        #[source]
        source: PlacerError,
    },
}

/// The classification and move pipeline.
pub struct MediaPipeline<L: Ledger, P: Placer> {
    enumerator: SourceEnumerator,
    classifier: Classifier,
    router: Router,
    ledger: L,
    placer: P,
    source_root: PathBuf,
    dry_run: bool,
}

impl<L: Ledger, P: Placer> MediaPipeline<L, P> {
    pub fn new(
        enumerator: SourceEnumerator,
        classifier: Classifier,
        router: Router,
        ledger: L,
        placer: P,
        source_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            enumerator,
            classifier,
            router,
            ledger,
            placer,
            source_root: source_root.into(),
            dry_run: false,
        }
    }

    /// In a dry run files are classified and routed but neither moved nor
    /// recorded in the ledger.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one pass over the source directory.
    ///
    /// Per-item problems end up in the summary; only ledger failures (and an
    /// unusable placer) abort the run.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        self.placer
            .validate()
            .await
            .map_err(|source| PipelineError::PlacerNotReady {
                name: self.placer.name().to_string(),
                source,
            })?;

        info!(
            "Scanning {}{}",
            self.source_root.display(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut memo = DedupMemo::new();
        let mut summary = RunSummary::default();

        for candidate in self.enumerator.enumerate(&self.source_root) {
            summary.examined += 1;

            let id = candidate.ledger_id();
            if self.ledger.exists(&id)? {
                debug!("Already processed: {}", candidate.path.display());
                summary.already_processed += 1;
                continue;
            }

            let outcome = self.process(&candidate, &mut memo).await;

            if !self.dry_run {
                self.ledger.add(&id)?;
            }
            summary.record(candidate.path, outcome);
        }

        info!(
            "Run complete: {} examined, {} already processed, {} moved, {} without destination, {} failed",
            summary.examined,
            summary.already_processed,
            summary.moved,
            summary.no_destination,
            summary.failed
        );

        Ok(summary)
    }

    async fn process(&self, candidate: &CandidateFile, memo: &mut DedupMemo) -> ItemOutcome {
        let name = candidate.file_name();
        let file_name: &str = &name;

        let destination = match self.router.route_override(file_name) {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                let classification = self.classifier.classify(file_name).await;
                debug!("'{}' classified as {}", file_name, classification);

                match self.router.route(&classification, memo) {
                    RouteDecision::Destination(destination) => destination,
                    RouteDecision::NoDestination(reason) => {
                        info!("Skipping '{}': {}", file_name, reason);
                        return ItemOutcome::NoDestination {
                            reason: reason.to_string(),
                        };
                    }
                }
            }
            Err(e) => {
                warn!("Override for '{}' is unusable: {}", file_name, e);
                return ItemOutcome::NoDestination {
                    reason: e.to_string(),
                };
            }
        };

        if self.dry_run {
            let target = destination.path.join(file_name);
            info!("Would move '{}' to {}", file_name, target.display());
            return ItemOutcome::Moved {
                destination: target,
            };
        }

        match self.placer.place(&candidate.path, &destination.path).await {
            Ok(placed) => {
                info!(
                    "Moved '{}' to {} ({:?})",
                    file_name,
                    placed.destination.display(),
                    placed.method
                );
                ItemOutcome::Moved {
                    destination: placed.destination,
                }
            }
            Err(e) => {
                warn!("Failed to move '{}': {}", file_name, e);
                ItemOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

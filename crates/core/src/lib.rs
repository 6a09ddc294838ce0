pub mod classifier;
pub mod config;
pub mod ledger;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod placer;
pub mod router;
pub mod source;
pub mod testing;

pub use classifier::{ClassificationResult, Classifier, EpisodeId, SeasonId};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, MetadataBackend,
    SanitizedConfig,
};
pub use ledger::{FileLedger, Ledger, LedgerError};
pub use metadata::{create_metadata_lookup, MetadataError, MetadataLookup};
pub use parser::{ParsedName, ReleaseNameParser, SceneNameParser};
pub use pipeline::{ItemOutcome, ItemReport, MediaPipeline, PipelineError, RunSummary};
pub use placer::{FsPlacer, PlacedFile, Placer, PlacerConfig, PlacerError};
pub use router::{DedupMemo, Destination, RouteError, Router};
pub use source::{CandidateFile, SourceEnumerator};

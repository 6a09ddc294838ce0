use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::metadata::{OmdbConfig, TmdbConfig};
use crate::placer::PlacerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub library: LibraryConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub overrides: Vec<LocationOverrideConfig>,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub placer: PlacerConfig,
}

/// Watched download directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Root of the tree to scan
    pub path: PathBuf,
    /// Allowed file extensions, with or without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Path components that exclude everything below them
    #[serde(default = "default_ignore_markers")]
    pub ignore_markers: Vec<String>,
    /// Suffix of the sibling file a downloader keeps next to an unfinished download
    #[serde(default = "default_incomplete_suffix")]
    pub incomplete_suffix: String,
    /// Files modified more recently than this are left alone (default: 60)
    #[serde(default = "default_min_age_secs")]
    pub min_age_secs: u64,
}

impl SourceConfig {
    pub fn min_age(&self) -> Duration {
        Duration::from_secs(self.min_age_secs)
    }
}

fn default_extensions() -> Vec<String> {
    vec!["mkv".to_string(), "mp4".to_string()]
}

fn default_ignore_markers() -> Vec<String> {
    vec!["__MACOSX".to_string(), ".AppleDouble".to_string()]
}

fn default_incomplete_suffix() -> String {
    ".aria2".to_string()
}

fn default_min_age_secs() -> u64 {
    60
}

/// Library roots files are moved into
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    pub movies: PathBuf,
    pub tv: PathBuf,
}

/// Processed-file ledger location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("movemedia_processed.txt")
}

/// Classification tweaks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Lowercase titles treated as TV even without season/episode tokens
    #[serde(default)]
    pub known_tv_titles: Vec<String>,
}

/// A filename pattern that always goes to a fixed directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationOverrideConfig {
    /// Regex matched case-insensitively against the bare file name
    pub pattern: String,
    /// Existing directory the file is moved into
    pub destination: PathBuf,
}

/// Metadata lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub backend: MetadataBackend,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            backend: MetadataBackend::default(),
            timeout_secs: default_timeout(),
            omdb: None,
            tmdb: None,
        }
    }
}

fn default_timeout() -> u32 {
    30
}

/// Available metadata backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetadataBackend {
    Omdb,
    Tmdb,
    /// Movie confirmation disabled; everything falls through to the TV test
    #[default]
    None,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub source: SourceConfig,
    pub library: LibraryConfig,
    pub ledger: LedgerConfig,
    pub classifier: ClassifierConfig,
    pub overrides: Vec<LocationOverrideConfig>,
    pub metadata: SanitizedMetadataConfig,
    pub placer: PlacerConfig,
}

/// Sanitized metadata config (API keys hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub backend: MetadataBackend,
    pub timeout_secs: u32,
    pub omdb_api_key_configured: bool,
    pub tmdb_api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            library: config.library.clone(),
            ledger: config.ledger.clone(),
            classifier: config.classifier.clone(),
            overrides: config.overrides.clone(),
            metadata: SanitizedMetadataConfig {
                backend: config.metadata.backend,
                timeout_secs: config.metadata.timeout_secs,
                omdb_api_key_configured: config
                    .metadata
                    .omdb
                    .as_ref()
                    .is_some_and(|o| !o.api_key.is_empty()),
                tmdb_api_key_configured: config
                    .metadata
                    .tmdb
                    .as_ref()
                    .is_some_and(|t| !t.api_key.is_empty()),
            },
            placer: config.placer.clone(),
        }
    }
}

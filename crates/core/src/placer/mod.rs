//! Placer module: the non-destructive move of a file into its library folder.
//!
//! # Behaviour
//!
//! - Never overwrites: an existing `<destination>/<file name>` is an error
//! - Creates the destination directory and its parents when missing
//! - Renames when source and destination share a filesystem
//! - Falls back to copy + delete across filesystems, optionally verifying a
//!   SHA-256 checksum of the copy before the source is removed

mod config;
mod error;
mod fs_placer;
mod traits;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::Placer;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMethod {
    Renamed,
    Copied,
}

/// Information about a placed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedFile {
    /// Final path of the file.
    pub destination: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    pub method: PlacementMethod,
    /// SHA-256 of the copy, when verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

//! Trait definitions for the placer module.

use std::path::Path;

use async_trait::async_trait;

use super::error::PlacerError;
use super::PlacedFile;

/// Moves a file into a destination directory without overwriting anything.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Returns the name of this placer implementation.
    fn name(&self) -> &str;

    /// Moves `source` into `destination_dir`, keeping its file name.
    ///
    /// Fails with [`PlacerError::DestinationExists`] if a file of that name
    /// is already there. The directory is created if absent.
    async fn place(&self, source: &Path, destination_dir: &Path) -> Result<PlacedFile, PlacerError>;

    /// Validates that the placer is properly configured and ready.
    async fn validate(&self) -> Result<(), PlacerError>;
}

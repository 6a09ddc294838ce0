//! Mock placer for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::placer::{PlacedFile, PlacementMethod, Placer, PlacerError};

/// A recorded placement for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPlacement {
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    /// Whether the placement succeeded.
    pub success: bool,
}

/// Mock implementation of the Placer trait.
///
/// Does not touch the filesystem; it records what it was asked to do.
///
/// # Example
///
/// ```rust,ignore
/// use movemedia_core::testing::MockPlacer;
///
/// let placer = MockPlacer::new();
/// placer.place(Path::new("/dl/a.mkv"), Path::new("/tv/Show")).await?;
///
/// let placements = placer.recorded_placements().await;
/// assert_eq!(placements.len(), 1);
/// assert!(placements[0].success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPlacer {
    /// Recorded placements.
    placements: Arc<RwLock<Vec<RecordedPlacement>>>,
    /// If set, the next placement will fail with this error.
    next_error: Arc<RwLock<Option<PlacerError>>>,
}

impl MockPlacer {
    /// Create a new mock placer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded placements.
    pub async fn recorded_placements(&self) -> Vec<RecordedPlacement> {
        self.placements.read().await.clone()
    }

    /// Get the number of placements attempted.
    pub async fn placement_count(&self) -> usize {
        self.placements.read().await.len()
    }

    /// Configure the next placement to fail with the given error.
    pub async fn set_next_error(&self, error: PlacerError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Placer for MockPlacer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn place(&self, source: &Path, destination_dir: &Path) -> Result<PlacedFile, PlacerError> {
        let error = self.next_error.write().await.take();

        self.placements.write().await.push(RecordedPlacement {
            source: source.to_path_buf(),
            destination_dir: destination_dir.to_path_buf(),
            success: error.is_none(),
        });

        if let Some(error) = error {
            return Err(error);
        }

        let file_name = source.file_name().ok_or_else(|| PlacerError::SourceNotFound {
            path: source.to_path_buf(),
        })?;

        Ok(PlacedFile {
            destination: destination_dir.join(file_name),
            size_bytes: 0,
            method: PlacementMethod::Renamed,
            checksum: None,
        })
    }

    async fn validate(&self) -> Result<(), PlacerError> {
        Ok(())
    }
}

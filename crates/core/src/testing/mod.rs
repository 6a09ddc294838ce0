//! Testing utilities and mock implementations.
//!
//! Mocks for the pipeline's seams, so that end-to-end runs can be exercised
//! without a metadata service and, for the placer, without moving files.
//!
//! # Example
//!
//! ```rust,ignore
//! use movemedia_core::testing::{MemoryLedger, MockMetadataLookup, MockPlacer};
//!
//! let lookup = MockMetadataLookup::new();
//! lookup.add_movie("Inception", 2010).await;
//!
//! let ledger = MemoryLedger::new();
//! let placer = MockPlacer::new();
//! // Wire into a MediaPipeline...
//! ```

mod memory_ledger;
mod mock_metadata;
mod mock_placer;

pub use memory_ledger::MemoryLedger;
pub use mock_metadata::MockMetadataLookup;
pub use mock_placer::{MockPlacer, RecordedPlacement};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime};

    /// Writes a non-empty file at `root/relative`, creating parents, and
    /// backdates its modification time by an hour.
    pub fn media_file(root: &Path, relative: &str) -> io::Result<PathBuf> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, b"fake video payload")?;
        backdate(&path, Duration::from_secs(3600))?;
        Ok(path)
    }

    /// Sets the modification time of `path` to `age` in the past.
    pub fn backdate(path: &Path, age: Duration) -> io::Result<()> {
        let file = std::fs::File::options().write(true).open(path)?;
        file.set_modified(SystemTime::now() - age)
    }
}

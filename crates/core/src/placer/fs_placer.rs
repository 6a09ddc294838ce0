//! File system placer implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, warn};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::traits::Placer;
use super::{PlacedFile, PlacementMethod};

/// File system based placer implementation.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Attempts to move a file atomically (rename).
    ///
    /// Returns `Ok(false)` when the rename crossed filesystems.
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // EXDEV is 18 on Linux
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies a file, hashing it on the way when `calculate_checksum` is set.
    ///
    /// The destination is opened with `create_new`, so an existing file is
    /// never truncated.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                PlacerError::Io(e)
            }
        })?;

        let dest_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    PlacerError::DestinationExists {
                        path: destination.to_path_buf(),
                    }
                } else {
                    PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
                }
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);

        let mut hasher = if calculate_checksum {
            Some(Sha256::new())
        } else {
            None
        };

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;
        writer.get_ref().sync_all().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let checksum = hasher.map(|h| format!("{:x}", h.finalize()));

        Ok((total_bytes, checksum))
    }

    /// Calculates the SHA-256 checksum of a file.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path)
            .await
            .map_err(|e| PlacerError::ChecksumCalculationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();
        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::ChecksumCalculationFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Creates the destination directory and its parents.
    async fn ensure_dir(&self, dir: &Path) -> Result<(), PlacerError> {
        if fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
            return Ok(());
        }
        fs::create_dir_all(dir)
            .await
            .map_err(|e| PlacerError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })
    }

    /// Copies, verifies and then removes the source.
    ///
    /// A failed copy or verification removes the partial destination and
    /// leaves the source untouched.
    async fn copy_then_delete(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<PlacedFile, PlacerError> {
        let copied = self
            .copy_file(source, destination, self.config.verify_checksums)
            .await;

        let (size_bytes, checksum) = match copied {
            Ok(result) => result,
            Err(e) => {
                if !matches!(e, PlacerError::DestinationExists { .. }) {
                    remove_partial(destination).await;
                }
                return Err(e);
            }
        };

        if let Some(expected) = &checksum {
            let actual = match self.calculate_checksum(destination).await {
                Ok(actual) => actual,
                Err(e) => {
                    remove_partial(destination).await;
                    return Err(e);
                }
            };
            if &actual != expected {
                remove_partial(destination).await;
                return Err(PlacerError::ChecksumMismatch {
                    path: destination.to_path_buf(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        fs::remove_file(source)
            .await
            .map_err(|e| PlacerError::CleanupFailed {
                path: source.to_path_buf(),
                source: e,
            })?;

        Ok(PlacedFile {
            destination: destination.to_path_buf(),
            size_bytes,
            method: PlacementMethod::Copied,
            checksum,
        })
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove partial copy {}: {}", path.display(), e);
        }
    }
}

fn target_path(source: &Path, destination_dir: &Path) -> Result<PathBuf, PlacerError> {
    let file_name = source.file_name().ok_or_else(|| PlacerError::SourceNotFound {
        path: source.to_path_buf(),
    })?;
    Ok(destination_dir.join(file_name))
}

#[async_trait]
impl Placer for FsPlacer {
    fn name(&self) -> &str {
        "fs"
    }

    async fn place(&self, source: &Path, destination_dir: &Path) -> Result<PlacedFile, PlacerError> {
        let metadata = match fs::metadata(source).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => {
                return Err(PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                })
            }
            Err(e) => return Err(PlacerError::Io(e)),
        };

        let destination = target_path(source, destination_dir)?;
        if fs::symlink_metadata(&destination).await.is_ok() {
            return Err(PlacerError::DestinationExists { path: destination });
        }

        self.ensure_dir(destination_dir).await?;

        if self.config.prefer_atomic_moves {
            let renamed = Self::try_atomic_move(source, &destination)
                .await
                .map_err(|e| PlacerError::move_failed(source.to_path_buf(), destination.clone(), e))?;

            if renamed {
                debug!("Renamed {} -> {}", source.display(), destination.display());
                let checksum = if self.config.verify_checksums {
                    Some(self.calculate_checksum(&destination).await?)
                } else {
                    None
                };
                return Ok(PlacedFile {
                    destination,
                    size_bytes: metadata.len(),
                    method: PlacementMethod::Renamed,
                    checksum,
                });
            }

            if !self.config.copy_across_devices {
                return Err(PlacerError::CrossDevice {
                    from: source.to_path_buf(),
                    destination,
                });
            }
            debug!(
                "{} and {} are on different filesystems, copying",
                source.display(),
                destination.display()
            );
        }

        self.copy_then_delete(source, &destination).await
    }

    async fn validate(&self) -> Result<(), PlacerError> {
        if self.config.buffer_size == 0 {
            return Err(PlacerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "buffer_size must be greater than zero",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_place_renames_into_new_directory() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("downloads/Inception.2010.mkv");
        let dest_dir = temp.path().join("Movies/Inception.2010");

        fs::create_dir_all(source_path.parent().unwrap()).await.unwrap();
        fs::write(&source_path, "movie bytes").await.unwrap();

        let placer = FsPlacer::with_defaults();
        let placed = placer.place(&source_path, &dest_dir).await.unwrap();

        assert_eq!(placed.destination, dest_dir.join("Inception.2010.mkv"));
        assert_eq!(placed.method, PlacementMethod::Renamed);
        assert_eq!(placed.size_bytes, 11);
        assert!(placed.checksum.is_none());
        assert!(!source_path.exists());
        assert_eq!(
            fs::read_to_string(&placed.destination).await.unwrap(),
            "movie bytes"
        );
    }

    #[tokio::test]
    async fn test_copy_path_removes_source() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("source.mkv");
        let dest_dir = temp.path().join("TV/Random Show");

        fs::write(&source_path, "episode bytes").await.unwrap();

        let placer = FsPlacer::new(PlacerConfig::default().with_atomic_moves(false));
        let placed = placer.place(&source_path, &dest_dir).await.unwrap();

        assert_eq!(placed.method, PlacementMethod::Copied);
        assert!(dest_dir.join("source.mkv").exists());
        assert!(!source_path.exists());
    }

    #[tokio::test]
    async fn test_destination_exists_error() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("show.mkv");
        let dest_dir = temp.path().join("TV");

        fs::write(&source_path, "new content").await.unwrap();
        fs::create_dir_all(&dest_dir).await.unwrap();
        fs::write(dest_dir.join("show.mkv"), "existing content")
            .await
            .unwrap();

        let placer = FsPlacer::with_defaults();
        let result = placer.place(&source_path, &dest_dir).await;
        assert!(matches!(result, Err(PlacerError::DestinationExists { .. })));

        // Neither side was touched.
        assert_eq!(
            fs::read_to_string(&source_path).await.unwrap(),
            "new content"
        );
        assert_eq!(
            fs::read_to_string(dest_dir.join("show.mkv")).await.unwrap(),
            "existing content"
        );
    }

    #[tokio::test]
    async fn test_destination_exists_on_copy_path() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("show.mkv");
        let dest_dir = temp.path().join("TV");

        fs::write(&source_path, "new content").await.unwrap();
        fs::create_dir_all(&dest_dir).await.unwrap();
        fs::write(dest_dir.join("show.mkv"), "existing content")
            .await
            .unwrap();

        let placer = FsPlacer::new(PlacerConfig::default().with_atomic_moves(false));
        let result = placer.place(&source_path, &dest_dir).await;
        assert!(matches!(result, Err(PlacerError::DestinationExists { .. })));
        assert!(source_path.exists());
        assert_eq!(
            fs::read_to_string(dest_dir.join("show.mkv")).await.unwrap(),
            "existing content"
        );
    }

    #[tokio::test]
    async fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let placer = FsPlacer::with_defaults();

        let result = placer
            .place(&temp.path().join("gone.mkv"), &temp.path().join("Movies"))
            .await;
        assert!(matches!(result, Err(PlacerError::SourceNotFound { .. })));
        assert!(!temp.path().join("Movies").exists());
    }

    #[tokio::test]
    async fn test_destination_dir_is_a_file() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("movie.mkv");
        let blocker = temp.path().join("Movies");

        fs::write(&source_path, "bytes").await.unwrap();
        fs::write(&blocker, "not a directory").await.unwrap();

        let placer = FsPlacer::with_defaults();
        let result = placer.place(&source_path, &blocker).await;
        assert!(result.is_err());
        assert!(source_path.exists());
    }

    #[tokio::test]
    async fn test_checksum_verification() {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("source.mkv");
        let dest_dir = temp.path().join("out");

        fs::write(&source_path, "test content for checksum")
            .await
            .unwrap();

        let placer = FsPlacer::new(
            PlacerConfig::default()
                .with_atomic_moves(false)
                .with_checksum_verification(true),
        );
        let placed = placer.place(&source_path, &dest_dir).await.unwrap();

        let expected = format!("{:x}", Sha256::digest(b"test content for checksum"));
        assert_eq!(placed.checksum.as_deref(), Some(expected.as_str()));
        assert!(!source_path.exists());
    }

    #[tokio::test]
    async fn test_validate_rejects_zero_buffer() {
        assert!(FsPlacer::with_defaults().validate().await.is_ok());

        let placer = FsPlacer::new(PlacerConfig::default().with_buffer_size(0));
        assert!(placer.validate().await.is_err());
    }
}

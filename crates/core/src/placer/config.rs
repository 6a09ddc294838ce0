//! Configuration for the placer module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system placer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Whether to try a rename before copying.
    #[serde(default = "default_true")]
    pub prefer_atomic_moves: bool,

    /// Whether a rename that fails because source and destination are on
    /// different filesystems falls back to copy + delete.
    #[serde(default = "default_true")]
    pub copy_across_devices: bool,

    /// Whether to compare SHA-256 checksums of source and copy before the
    /// source is deleted.
    #[serde(default)]
    pub verify_checksums: bool,
}

fn default_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

fn default_true() -> bool {
    true
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            prefer_atomic_moves: true,
            copy_across_devices: true,
            verify_checksums: false,
        }
    }
}

impl PlacerConfig {
    /// Enables or disables the rename attempt.
    pub fn with_atomic_moves(mut self, enabled: bool) -> Self {
        self.prefer_atomic_moves = enabled;
        self
    }

    /// Enables or disables the cross-device copy fallback.
    pub fn with_copy_across_devices(mut self, enabled: bool) -> Self {
        self.copy_across_devices = enabled;
        self
    }

    /// Enables checksum verification.
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacerConfig::default();
        assert_eq!(config.buffer_size, 8 * 1024 * 1024);
        assert!(config.prefer_atomic_moves);
        assert!(config.copy_across_devices);
        assert!(!config.verify_checksums);
    }

    #[test]
    fn test_config_builder() {
        let config = PlacerConfig::default()
            .with_atomic_moves(false)
            .with_copy_across_devices(false)
            .with_checksum_verification(true)
            .with_buffer_size(1024 * 1024);

        assert!(!config.prefer_atomic_moves);
        assert!(!config.copy_across_devices);
        assert!(config.verify_checksums);
        assert_eq!(config.buffer_size, 1024 * 1024);
    }

    #[test]
    fn test_empty_table_uses_defaults() {
        let config: PlacerConfig = toml::from_str("").unwrap();
        assert!(config.copy_across_devices);
        assert_eq!(config.buffer_size, 8 * 1024 * 1024);
    }
}

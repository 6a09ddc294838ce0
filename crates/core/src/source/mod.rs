//! Source enumerator: candidate media files under a watched directory.
//!
//! Each call to [`SourceEnumerator::enumerate`] walks the tree again, so the
//! sequence reflects the directory contents at call time. Files are excluded
//! by the first matching rule, in this order:
//!
//! 1. extension not in the allow-list
//! 2. a path component equals an ignore marker (e.g. `__MACOSX`)
//! 3. a sibling `<file><incomplete_suffix>` marker exists (download in progress)
//! 4. zero size
//! 5. modified more recently than the minimum age
//!
//! Paths containing a line break are also skipped, with a warning, since
//! they cannot be stored in the ledger.

mod types;

pub use types::{CandidateFile, Exclusion};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::SourceConfig;

/// Lists candidate files below a root directory.
#[derive(Debug, Clone)]
pub struct SourceEnumerator {
    extensions: Vec<String>,
    ignore_markers: Vec<OsString>,
    incomplete_suffix: String,
    min_age: Duration,
}

impl SourceEnumerator {
    /// Creates an enumerator from the source configuration.
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            ignore_markers: config.ignore_markers.iter().map(OsString::from).collect(),
            incomplete_suffix: config.incomplete_suffix.clone(),
            min_age: config.min_age(),
        }
    }

    /// Overrides the minimum age threshold.
    pub fn with_min_age(mut self, min_age: Duration) -> Self {
        self.min_age = min_age;
        self
    }

    /// Lazily walks `root`, yielding files that pass every exclusion rule.
    pub fn enumerate<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = CandidateFile> + 'a {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                let path = entry.into_path();
                match self.check(root, &path, SystemTime::now()) {
                    Ok(candidate) => {
                        if path.file_name().and_then(|n| n.to_str()).is_none() {
                            warn!(
                                "File name of {} is not valid UTF-8, matching as '{}'",
                                path.display(),
                                candidate.file_name()
                            );
                        }
                        Some(candidate)
                    }
                    Err(Exclusion::LineBreak) => {
                        warn!("Excluding {:?}: {}", path, Exclusion::LineBreak);
                        None
                    }
                    Err(reason) => {
                        debug!("Excluding {}: {}", path.display(), reason);
                        None
                    }
                }
            })
    }

    /// Applies the exclusion rules to a single file.
    fn check(&self, root: &Path, path: &Path, now: SystemTime) -> Result<CandidateFile, Exclusion> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !self.extensions.contains(&extension) {
            return Err(Exclusion::Extension);
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if relative
            .components()
            .any(|c| self.ignore_markers.iter().any(|m| m == c.as_os_str()))
        {
            return Err(Exclusion::IgnoreMarker);
        }

        if self.incomplete_marker(path).exists() {
            return Err(Exclusion::Incomplete);
        }

        let metadata = std::fs::metadata(path).map_err(|_| Exclusion::Unreadable)?;
        if metadata.len() == 0 {
            return Err(Exclusion::Empty);
        }

        let modified = metadata.modified().map_err(|_| Exclusion::Unreadable)?;
        // A timestamp in the future counts as brand new.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age < self.min_age {
            return Err(Exclusion::TooRecent);
        }

        if path
            .as_os_str()
            .as_encoded_bytes()
            .iter()
            .any(|b| *b == b'\n' || *b == b'\r')
        {
            return Err(Exclusion::LineBreak);
        }

        Ok(CandidateFile {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified,
            extension,
        })
    }

    fn incomplete_marker(&self, path: &Path) -> PathBuf {
        let mut marker = path.as_os_str().to_owned();
        marker.push(&self.incomplete_suffix);
        PathBuf::from(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> SourceConfig {
        SourceConfig {
            path: PathBuf::from("/unused"),
            extensions: vec![".mkv".to_string(), "mp4".to_string()],
            ignore_markers: vec!["__MACOSX".to_string()],
            incomplete_suffix: ".aria2".to_string(),
            min_age_secs: 0,
        }
    }

    fn names(enumerator: &SourceEnumerator, root: &Path) -> Vec<String> {
        enumerator
            .enumerate(root)
            .map(|c| c.file_name().into_owned())
            .collect()
    }

    #[test]
    fn test_enumerate_filters_extension_and_recurses() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Show/Season 1")).unwrap();
        fs::write(temp.path().join("Movie.2010.mkv"), b"video").unwrap();
        fs::write(temp.path().join("Movie.2010.nfo"), b"info").unwrap();
        fs::write(temp.path().join("Show/Season 1/Show.S01E01.MP4"), b"video").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        assert_eq!(
            names(&enumerator, temp.path()),
            vec!["Movie.2010.mkv", "Show.S01E01.MP4"]
        );
    }

    #[test]
    fn test_enumerate_skips_ignore_marker_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("__MACOSX")).unwrap();
        fs::write(temp.path().join("__MACOSX/Movie.2010.mkv"), b"meta").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        assert!(names(&enumerator, temp.path()).is_empty());
    }

    #[test]
    fn test_enumerate_skips_incomplete_and_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Partial.mkv"), b"half").unwrap();
        fs::write(temp.path().join("Partial.mkv.aria2"), b"control").unwrap();
        fs::write(temp.path().join("Empty.mkv"), b"").unwrap();
        fs::write(temp.path().join("Done.mkv"), b"video").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        assert_eq!(names(&enumerator, temp.path()), vec!["Done.mkv"]);
    }

    #[test]
    fn test_enumerate_skips_recently_modified() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Fresh.mkv"), b"video").unwrap();

        let enumerator =
            SourceEnumerator::new(&config()).with_min_age(Duration::from_secs(3600));
        assert!(names(&enumerator, temp.path()).is_empty());
    }

    #[test]
    fn test_exclusion_order_extension_first() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Empty.txt");
        fs::write(&path, b"").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        let result = enumerator.check(temp.path(), &path, SystemTime::now());
        assert_eq!(result.unwrap_err(), Exclusion::Extension);
    }

    #[test]
    fn test_exclusion_order_incomplete_before_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Empty.mkv");
        fs::write(&path, b"").unwrap();
        fs::write(temp.path().join("Empty.mkv.aria2"), b"").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        let result = enumerator.check(temp.path(), &path, SystemTime::now());
        assert_eq!(result.unwrap_err(), Exclusion::Incomplete);
    }

    #[test]
    fn test_candidate_attributes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.2010.MKV");
        fs::write(&path, b"12345").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        let candidate = enumerator
            .check(temp.path(), &path, SystemTime::now() + Duration::from_secs(1))
            .unwrap();
        assert_eq!(candidate.size_bytes, 5);
        assert_eq!(candidate.extension, "mkv");
        assert_eq!(candidate.file_name(), "Movie.2010.MKV");
    }

    #[test]
    fn test_enumerate_skips_names_with_line_breaks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("home\nvideo.mp4"), b"video").unwrap();
        fs::write(temp.path().join("home\rclip.mp4"), b"video").unwrap();
        fs::write(temp.path().join("home video.mp4"), b"video").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        assert_eq!(names(&enumerator, temp.path()), vec!["home video.mp4"]);

        let result = enumerator.check(
            temp.path(),
            &temp.path().join("home\nvideo.mp4"),
            SystemTime::now(),
        );
        assert_eq!(result.unwrap_err(), Exclusion::LineBreak);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_matched_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let path = temp
            .path()
            .join(OsStr::from_bytes(b"Inception.2010.\xff.mkv"));
        fs::write(&path, b"video").unwrap();

        let enumerator = SourceEnumerator::new(&config());
        assert_eq!(
            names(&enumerator, temp.path()),
            vec!["Inception.2010.\u{FFFD}.mkv"]
        );
    }

    #[test]
    fn test_enumerate_missing_root_is_empty() {
        let enumerator = SourceEnumerator::new(&config());
        assert!(names(&enumerator, Path::new("/nonexistent/downloads")).is_empty());
    }
}

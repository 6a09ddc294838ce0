//! Types for the source enumerator.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// A file found under the watched directory that passed every exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last-modified time.
    pub modified: SystemTime,
    /// Lowercase extension without the dot.
    pub extension: String,
}

impl CandidateFile {
    /// Bare file name, as matched by the override table and parsed by the classifier.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    /// Identifier recorded in the ledger.
    pub fn ledger_id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Why a file was not yielded by the enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Extension,
    IgnoreMarker,
    Incomplete,
    Empty,
    TooRecent,
    /// The path contains `\n` or `\r`, which the line-based ledger cannot record.
    LineBreak,
    Unreadable,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::Extension => "extension not allowed",
            Exclusion::IgnoreMarker => "inside an ignored directory",
            Exclusion::Incomplete => "download in progress",
            Exclusion::Empty => "empty file",
            Exclusion::TooRecent => "modified too recently",
            Exclusion::LineBreak => "path contains a line break",
            Exclusion::Unreadable => "metadata unreadable",
        };
        f.write_str(reason)
    }
}

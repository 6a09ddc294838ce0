//! Location override table: filename regex → fixed destination.

use std::path::{Path, PathBuf};

use regex_lite::{Regex, RegexBuilder};

use super::RouteError;
use crate::config::LocationOverrideConfig;

/// One compiled override.
#[derive(Debug, Clone)]
pub struct LocationOverride {
    pattern: Regex,
    destination: PathBuf,
}

impl LocationOverride {
    /// Compiles `pattern` case-insensitively.
    pub fn new(pattern: &str, destination: impl Into<PathBuf>) -> Result<Self, RouteError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern,
            destination: destination.into(),
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether the bare file name matches.
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }
}

/// Ordered override table; the first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct LocationOverrides {
    entries: Vec<LocationOverride>,
}

impl LocationOverrides {
    pub fn new(entries: Vec<LocationOverride>) -> Self {
        Self { entries }
    }

    /// Compiles the `[[overrides]]` configuration entries.
    pub fn from_config(config: &[LocationOverrideConfig]) -> Result<Self, RouteError> {
        let entries = config
            .iter()
            .map(|o| LocationOverride::new(&o.pattern, o.destination.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    /// First override whose pattern matches the bare file name.
    pub fn find(&self, file_name: &str) -> Option<&LocationOverride> {
        self.entries.iter().find(|o| o.matches(file_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

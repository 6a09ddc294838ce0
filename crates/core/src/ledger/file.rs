//! Text-file ledger: one identifier per line.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{Ledger, LedgerError};

/// Ledger backed by a newline-delimited text file.
///
/// Every call reopens the file, so records written by an earlier process
/// (or another instance in this one) are always visible.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    /// Creates a ledger stored at `path`. The file is created on first `add`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_failed(&self, source: std::io::Error) -> LedgerError {
        LedgerError::ReadFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl Ledger for FileLedger {
    fn exists(&self, id: &str) -> Result<bool, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.read_failed(e)),
        };

        let id = id.trim();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.read_failed(e))?;
            if line.trim() == id {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn add(&self, id: &str) -> Result<(), LedgerError> {
        if id.contains(['\n', '\r']) {
            return Err(LedgerError::InvalidId(id.to_string()));
        }

        let write_failed = |source| LedgerError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_failed)?;

        writeln!(file, "{}", id).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;

        Ok(())
    }
}

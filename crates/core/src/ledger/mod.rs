//! Ledger of processed items.
//!
//! The ledger is a durable, append-only set of identifiers (in practice the
//! absolute path of a source file). The pipeline consults it before touching
//! a file and appends to it once an attempt has finished, which makes repeated
//! runs over the same directory idempotent.
//!
//! A missing backing store is a normal state: it is an empty ledger.

mod file;

pub use file::FileLedger;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read the backing store (other than it being absent).
    #[error("Failed to read ledger {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The id cannot be stored as a single line.
    #[error("Ledger id contains a line break: {0:?}")]
    InvalidId(String),

    /// Failed to append a record.
    #[error("Failed to append to ledger {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only record of processed item identifiers.
///
/// Single-process, single-writer use only; implementations do no locking.
pub trait Ledger: Send + Sync {
    /// Returns true if `id` was previously passed to [`Ledger::add`],
    /// including by an earlier process.
    fn exists(&self, id: &str) -> Result<bool, LedgerError>;

    /// Appends `id`. Never deduplicates and never removes.
    ///
    /// Ids containing `\n` or `\r` are rejected with [`LedgerError::InvalidId`].
    fn add(&self, id: &str) -> Result<(), LedgerError>;
}

//! In-memory ledger for testing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::ledger::{Ledger, LedgerError};

/// Ledger kept in a `Vec`, with injectable write failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Arc<Mutex<Vec<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `add` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// All records, in append order.
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Ledger for MemoryLedger {
    fn exists(&self, id: &str) -> Result<bool, LedgerError> {
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).iter().any(|r| r == id))
    }

    fn add(&self, id: &str) -> Result<(), LedgerError> {
        if id.contains(['\n', '\r']) {
            return Err(LedgerError::InvalidId(id.to_string()));
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteFailed {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("injected failure"),
            });
        }
        self.records.lock().unwrap_or_else(|e| e.into_inner()).push(id.to_string());
        Ok(())
    }
}

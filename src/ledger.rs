//! Progress ledger: append-only record of identifiers already fully processed.
//!
//! The ledger file is the one shared mutable resource in the system. Discipline:
//! single writer, exclusive access for the duration of an append, and the file
//! is treated as append-only; it is never rewritten or truncated.

use crate::catalog::Catalog;
use crate::error::ControllerError;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only completion ledger and its loaded in-memory view.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    completed: HashSet<String>,
}

impl Ledger {
    /// Load the ledger, validating every entry against the catalog.
    ///
    /// A missing file is an empty ledger (first invocation). Fails with
    /// `LedgerCorrupt` if an entry references an identifier not present in the
    /// catalog (catalog/ledger drift between runs) or appears more than once.
    pub fn load(path: &Path, catalog: &Catalog) -> Result<Self, ControllerError> {
        let mut completed = HashSet::new();
        if path.exists() {
            let raw = fs::read_to_string(path)?;
            for line in raw.lines() {
                let id = line.trim();
                if id.is_empty() {
                    continue;
                }
                if !catalog.contains(id) {
                    return Err(ControllerError::LedgerCorrupt(format!(
                        "entry '{}' is not in the catalog (catalog/ledger drift)",
                        id
                    )));
                }
                if !completed.insert(id.to_string()) {
                    return Err(ControllerError::LedgerCorrupt(format!(
                        "duplicate entry '{}'",
                        id
                    )));
                }
            }
        }
        debug!(path = %path.display(), completed = completed.len(), "ledger loaded");
        Ok(Self {
            path: path.to_path_buf(),
            completed,
        })
    }

    /// Identifiers already committed.
    pub fn completed(&self) -> &HashSet<String> {
        &self.completed
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit one identifier.
    ///
    /// The file handle is scoped to this call and the entry is flushed and
    /// fsynced before the handle is released, so a crash after return cannot
    /// lose the commit. The entry is written with a single write call so a
    /// partial line is never interpretable as a committed entry.
    ///
    /// Appending an identifier already present is a `DuplicateAppend` contract
    /// violation; the orchestrator checks selection against the loaded set
    /// before calling this.
    pub fn append(&mut self, id: &str) -> Result<(), ControllerError> {
        if self.completed.contains(id) {
            return Err(ControllerError::DuplicateAppend(id.to_string()));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{}\n", id).as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        drop(file);
        self.completed.insert(id.to_string());
        debug!(item = id, "ledger entry committed");
        Ok(())
    }
}

//! Work-item catalog: the immutable ordered list of identifiers to process.
//!
//! The catalog source is a newline-delimited file of identifiers. Order is part
//! of the deterministic selection contract and must never be reordered once
//! generation has begun. Blank lines and `#` comment lines are skipped.

use crate::error::ControllerError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// A single catalog entry, created at load time and immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Unique identifier, stable across runs.
    pub id: String,
    /// True when the identifier belongs to the configured small-item set,
    /// allowing a second item to be processed in the same invocation.
    pub batchable: bool,
}

/// Ordered, read-only sequence of work items for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<WorkItem>,
}

impl Catalog {
    /// Load the catalog from a newline-delimited file.
    ///
    /// Fails with `CatalogCorrupt` if the source is unreadable, empty after
    /// filtering, contains duplicate identifiers (duplicates would break the
    /// ledger subset invariant), or contains identifiers whose sanitized
    /// output directories collide.
    pub fn load(path: &Path, small_items: &HashSet<String>) -> Result<Self, ControllerError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ControllerError::CatalogCorrupt(format!(
                "failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw, small_items)
    }

    /// Parse catalog content. Split out from `load` so tests can exercise the
    /// validation rules without touching the filesystem.
    pub fn parse(raw: &str, small_items: &HashSet<String>) -> Result<Self, ControllerError> {
        let mut seen = HashSet::new();
        let mut folders: HashMap<String, String> = HashMap::new();
        let mut items = Vec::new();
        for line in raw.lines() {
            let id = line.trim();
            if id.is_empty() || id.starts_with('#') {
                continue;
            }
            if !seen.insert(id.to_string()) {
                return Err(ControllerError::CatalogCorrupt(format!(
                    "duplicate identifier '{}'",
                    id
                )));
            }
            // Distinct identifiers must keep distinct artifact directories.
            let folder = crate::artifact::folder_name(id);
            if let Some(other) = folders.insert(folder.clone(), id.to_string()) {
                return Err(ControllerError::CatalogCorrupt(format!(
                    "identifiers '{}' and '{}' map to the same output directory '{}'",
                    other, id, folder
                )));
            }
            items.push(WorkItem {
                id: id.to_string(),
                batchable: small_items.contains(id),
            });
        }
        if items.is_empty() {
            return Err(ControllerError::CatalogCorrupt(
                "catalog contains no identifiers".to_string(),
            ));
        }
        Ok(Self { items })
    }

    /// Items in catalog order.
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

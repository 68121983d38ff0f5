//! Artifact store: one Markdown output per identifier.
//!
//! Output paths are derived deterministically from the identifier:
//! `{root}/{Title_Case_id}/book.md`. Writes use a temp file and rename so a
//! crash mid-write never leaves a torn artifact, and re-running after a prior
//! partial failure overwrites whatever stale file exists.

use crate::error::ControllerError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Filesystem store for generated documents.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic output path for an identifier.
    pub fn artifact_path(&self, id: &str) -> PathBuf {
        self.root.join(folder_name(id)).join("book.md")
    }

    /// Persist a document with overwrite-if-exists semantics.
    ///
    /// Creates the per-item directory if absent. Any failure is a
    /// `PersistenceFailed` naming the identifier.
    pub fn store(&self, id: &str, content: &str) -> Result<PathBuf, ControllerError> {
        let path = self.artifact_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ControllerError::PersistenceFailed {
                item: id.to_string(),
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }

        let temp_path = path.with_extension("md.tmp");
        fs::write(&temp_path, content).map_err(|e| ControllerError::PersistenceFailed {
            item: id.to_string(),
            reason: format!("failed to write {}: {}", temp_path.display(), e),
        })?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ControllerError::PersistenceFailed {
                item: id.to_string(),
                reason: format!("failed to rename into {}: {}", path.display(), e),
            }
        })?;

        info!(item = id, path = %path.display(), "artifact written");
        Ok(path)
    }
}

/// Directory name for an identifier: first character upper-cased, spaces
/// replaced with underscores, and anything path-hostile dropped. Sanitization
/// can map distinct identifiers to the same name; catalog loading rejects
/// such collisions so no artifact can shadow another's.
pub(crate) fn folder_name(id: &str) -> String {
    let mut chars = id.trim().chars();
    let title_cased: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    title_cased
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | '#'))
        .take(200)
        .collect()
}

//! Error types for the scribe generation controller.

use thiserror::Error;

/// Controller errors
///
/// Every stage of a run (catalog load, ledger load, selection, generation,
/// persistence, ledger commit) surfaces a typed failure here. All failures abort
/// the current invocation with no partial ledger mutation; re-running later is
/// the retry mechanism.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Catalog corrupt: {0}")]
    CatalogCorrupt(String),

    #[error("Ledger corrupt: {0}")]
    LedgerCorrupt(String),

    #[error("Generation failed for '{item}': {reason}")]
    GenerationFailed { item: String, reason: String },

    #[error("Persistence failed for '{item}': {reason}")]
    PersistenceFailed { item: String, reason: String },

    #[error("Duplicate ledger append for '{0}' (internal invariant violation)")]
    DuplicateAppend(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ControllerError {
    fn from(err: config::ConfigError) -> Self {
        ControllerError::ConfigError(err.to_string())
    }
}

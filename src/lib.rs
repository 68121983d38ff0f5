//! Scribe: resumable, deterministic batch generation of per-item documents.
//!
//! A catalog file lists work-item identifiers in a fixed order; an append-only
//! ledger records the identifiers already completed. Each invocation selects
//! the next one or two uncompleted items deterministically, generates a
//! Markdown document for each through a pluggable generator, persists it, and
//! commits the identifier to the ledger. Progress survives crashes and
//! interruptions; re-running is the only retry mechanism needed.

pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod logging;
pub mod orchestrator;
pub mod selection;

pub use error::ControllerError;

//! Generation orchestrator: one controller invocation end to end.
//!
//! Loads nothing itself; catalog, ledger, store and generator are injected.
//! Per selected identifier, strictly in order: generate, persist the artifact,
//! then commit the ledger entry. A crash between persist and commit is safe:
//! the next invocation finds the identifier still uncommitted and regenerates
//! it, overwriting the stale file. At-least-once generation, exactly-once
//! ledger commit.

use crate::artifact::ArtifactStore;
use crate::catalog::{Catalog, WorkItem};
use crate::error::ControllerError;
use crate::generator::{ContentGenerator, GenerationConstraints};
use crate::ledger::Ledger;
use crate::selection::select;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Parameters for a single controller invocation.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Force a specific catalog identifier, bypassing selection. The commit
    /// discipline is unchanged; an already-completed item is regenerated
    /// without a second ledger entry.
    pub forced_item: Option<String>,
    /// Enable the 1-or-2 selection rule.
    pub batch_small_items: bool,
    /// Report the selection without generating or committing.
    pub dry_run: bool,
}

/// One artifact written during the run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedItem {
    pub id: String,
    pub artifact_path: PathBuf,
    pub model: String,
}

/// Outcome of one controller invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Identifiers chosen for this invocation, in processing order.
    pub selected: Vec<String>,
    /// Artifacts actually generated and persisted.
    pub generated: Vec<GeneratedItem>,
    /// Items still uncommitted after this run.
    pub remaining: usize,
    pub dry_run: bool,
}

impl RunReport {
    /// Terminal state: every catalog item is already in the ledger.
    pub fn all_complete(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Run one generation batch against the injected collaborators.
///
/// Failure of any step aborts the remaining selected identifiers immediately
/// with no ledger mutation for the failing identifier or anything after it.
pub async fn run_batch(
    catalog: &Catalog,
    ledger: &mut Ledger,
    store: &ArtifactStore,
    generator: &dyn ContentGenerator,
    constraints: &GenerationConstraints,
    request: &RunRequest,
) -> Result<RunReport, ControllerError> {
    let selection: Vec<&WorkItem> = match &request.forced_item {
        Some(forced) => {
            let item = catalog.get(forced).ok_or_else(|| {
                ControllerError::ConfigError(format!(
                    "forced item '{}' is not in the catalog",
                    forced
                ))
            })?;
            vec![item]
        }
        None => select(catalog, ledger.completed(), request.batch_small_items),
    };

    let selected: Vec<String> = selection.iter().map(|item| item.id.clone()).collect();

    if selection.is_empty() {
        info!("all catalog items complete; nothing to do");
        return Ok(RunReport {
            selected,
            generated: Vec::new(),
            remaining: 0,
            dry_run: request.dry_run,
        });
    }

    if request.dry_run {
        info!(selection = ?selected, "dry run; skipping generation");
        return Ok(RunReport {
            remaining: catalog.len() - ledger.len(),
            selected,
            generated: Vec::new(),
            dry_run: true,
        });
    }

    let mut generated = Vec::new();
    for item in selection {
        info!(
            item = %item.id,
            generator = generator.generator_name(),
            "generation started"
        );
        let document = generator.generate(&item.id, constraints).await?;
        let artifact_path = store.store(&item.id, &document.content)?;
        if ledger.is_completed(&item.id) {
            // Only reachable via --item on an already-committed identifier:
            // the artifact is refreshed, the commit stays exactly-once.
            warn!(item = %item.id, "item already committed; artifact regenerated without re-commit");
        } else {
            ledger.append(&item.id)?;
        }
        info!(item = %item.id, path = %artifact_path.display(), "item committed");
        generated.push(GeneratedItem {
            id: item.id.clone(),
            artifact_path,
            model: document.model,
        });
    }

    Ok(RunReport {
        selected,
        generated,
        remaining: catalog.len() - ledger.len(),
        dry_run: false,
    })
}

/// Synchronous entry point for CLI callers.
///
/// The generator call is the only async boundary; a dedicated runtime is
/// created here and the batch is run to completion on it.
pub fn run_controller(
    catalog: &Catalog,
    ledger: &mut Ledger,
    store: &ArtifactStore,
    generator: &dyn ContentGenerator,
    constraints: &GenerationConstraints,
    request: &RunRequest,
) -> Result<RunReport, ControllerError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ControllerError::RuntimeError(
            "cannot run the controller from within an async runtime context".to_string(),
        ));
    }
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_batch(
        catalog,
        ledger,
        store,
        generator,
        constraints,
        request,
    ))
}

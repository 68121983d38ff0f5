//! CLI presentation: text and json formatters per command family.

use crate::error::ControllerError;
use crate::orchestrator::RunReport;
use serde::Serialize;
use std::path::PathBuf;

/// Progress snapshot for the `status` command.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub batching_enabled: bool,
    /// Identifiers the next `run` would process.
    pub next: Vec<String>,
}

/// Integrity summary for the `validate` command.
#[derive(Debug, Serialize)]
pub struct ValidationView {
    pub catalog_path: PathBuf,
    pub ledger_path: PathBuf,
    pub total: usize,
    pub completed: usize,
    pub valid: bool,
}

fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, ControllerError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ControllerError::ConfigError(format!("failed to serialize output: {}", e)))
}

pub fn format_run_report(report: &RunReport) -> String {
    if report.all_complete() {
        return "All catalog items are complete. Nothing to do.".to_string();
    }
    if report.dry_run {
        return format!(
            "Dry run. Would process: {}\nRemaining after: {} item(s)",
            report.selected.join(", "),
            report.remaining.saturating_sub(report.selected.len())
        );
    }
    let mut lines = vec![format!("Processed {} item(s):", report.generated.len())];
    for item in &report.generated {
        lines.push(format!("  {} -> {}", item.id, item.artifact_path.display()));
    }
    lines.push(format!("Remaining: {} item(s)", report.remaining));
    lines.join("\n")
}

pub fn format_status(view: &StatusView, format: &str) -> Result<String, ControllerError> {
    match format {
        "json" => to_json_pretty(view),
        "text" => {
            let next = if view.next.is_empty() {
                "(none; all complete)".to_string()
            } else {
                view.next.join(", ")
            };
            Ok(format!(
                "Progress: {}/{} complete ({} remaining)\nBatching: {}\nNext run would process: {}",
                view.completed,
                view.total,
                view.remaining,
                if view.batching_enabled { "enabled" } else { "disabled" },
                next
            ))
        }
        other => Err(ControllerError::ConfigError(format!(
            "Invalid format: '{}'. Must be 'text' or 'json'.",
            other
        ))),
    }
}

pub fn format_validation(view: &ValidationView, format: &str) -> Result<String, ControllerError> {
    match format {
        "json" => to_json_pretty(view),
        "text" => Ok(format!(
            "Catalog: {} ({} items)\nLedger: {} ({} committed)\nIntegrity: OK",
            view.catalog_path.display(),
            view.total,
            view.ledger_path.display(),
            view.completed
        )),
        other => Err(ControllerError::ConfigError(format!(
            "Invalid format: '{}'. Must be 'text' or 'json'.",
            other
        ))),
    }
}

//! CLI route: single route table and run context. Dispatches to the
//! orchestrator and presentation.

use crate::artifact::ArtifactStore;
use crate::catalog::Catalog;
use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, ScribeConfig};
use crate::error::ControllerError;
use crate::generator::{
    ChatCompletionsGenerator, ContentGenerator, GenerationConstraints, MockGenerator,
};
use crate::ledger::Ledger;
use crate::orchestrator::{run_controller, RunRequest};
use crate::selection::select;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::presentation::{
    format_run_report, format_status, format_validation, StatusView, ValidationView,
};

/// Runtime context for CLI execution: workspace root and loaded configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ScribeConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ControllerError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &ScribeConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ControllerError> {
        match command {
            Commands::Run {
                mock,
                no_batch,
                item,
                dry_run,
            } => self.handle_run(*mock, *no_batch, item.as_deref(), *dry_run),
            Commands::Status { format } => self.handle_status(format),
            Commands::Validate { format } => self.handle_validate(format),
        }
    }

    fn load_catalog(&self) -> Result<Catalog, ControllerError> {
        let path = ScribeConfig::resolve_path(&self.workspace_root, &self.config.catalog_path);
        Catalog::load(&path, &self.config.selection.small_item_set())
    }

    fn load_ledger(&self, catalog: &Catalog) -> Result<Ledger, ControllerError> {
        let path = ScribeConfig::resolve_path(&self.workspace_root, &self.config.ledger_path);
        Ledger::load(&path, catalog)
    }

    fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(ScribeConfig::resolve_path(
            &self.workspace_root,
            &self.config.output_root,
        ))
    }

    /// Generation constraints from config: configured prompt file when set,
    /// built-in default otherwise.
    fn constraints(&self) -> Result<GenerationConstraints, ControllerError> {
        let mut constraints = GenerationConstraints {
            temperature: self.config.generator.temperature,
            max_tokens: self.config.generator.max_tokens,
            ..GenerationConstraints::default()
        };
        if let Some(ref prompt_path) = self.config.prompt_path {
            let path = ScribeConfig::resolve_path(&self.workspace_root, prompt_path);
            constraints.system_prompt = std::fs::read_to_string(&path).map_err(|e| {
                ControllerError::ConfigError(format!(
                    "failed to read prompt file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(constraints)
    }

    fn build_generator(&self, mock: bool) -> Result<Box<dyn ContentGenerator>, ControllerError> {
        if mock || self.config.generator.mock {
            return Ok(Box::new(MockGenerator::new()));
        }
        let api_key = self.config.generator.resolve_api_key()?;
        let generator = ChatCompletionsGenerator::new(
            self.config.generator.model.clone(),
            api_key,
            self.config.generator.endpoint.clone(),
            Duration::from_secs(self.config.generator.timeout_secs),
        )?;
        Ok(Box::new(generator))
    }

    fn handle_run(
        &self,
        mock: bool,
        no_batch: bool,
        item: Option<&str>,
        dry_run: bool,
    ) -> Result<String, ControllerError> {
        let catalog = self.load_catalog()?;
        let mut ledger = self.load_ledger(&catalog)?;
        let store = self.artifact_store();
        let generator = self.build_generator(mock)?;
        let constraints = self.constraints()?;
        let request = RunRequest {
            forced_item: item.map(str::to_string),
            batch_small_items: self.config.selection.batch_small_items && !no_batch,
            dry_run,
        };

        info!(
            workspace = %self.workspace_root.display(),
            generator = generator.generator_name(),
            "run started"
        );
        let report = run_controller(
            &catalog,
            &mut ledger,
            &store,
            generator.as_ref(),
            &constraints,
            &request,
        )?;
        Ok(format_run_report(&report))
    }

    fn handle_status(&self, format: &str) -> Result<String, ControllerError> {
        let catalog = self.load_catalog()?;
        let ledger = self.load_ledger(&catalog)?;
        let next = select(
            &catalog,
            ledger.completed(),
            self.config.selection.batch_small_items,
        );
        let view = StatusView {
            total: catalog.len(),
            completed: ledger.len(),
            remaining: catalog.len() - ledger.len(),
            batching_enabled: self.config.selection.batch_small_items,
            next: next.iter().map(|item| item.id.clone()).collect(),
        };
        format_status(&view, format)
    }

    fn handle_validate(&self, format: &str) -> Result<String, ControllerError> {
        // Catalog and ledger loading enforce the integrity rules; reaching
        // the view construction means both passed.
        let catalog = self.load_catalog()?;
        let ledger = self.load_ledger(&catalog)?;
        let view = ValidationView {
            catalog_path: ScribeConfig::resolve_path(&self.workspace_root, &self.config.catalog_path),
            ledger_path: ScribeConfig::resolve_path(&self.workspace_root, &self.config.ledger_path),
            total: catalog.len(),
            completed: ledger.len(),
            valid: true,
        };
        format_validation(&view, format)
    }
}

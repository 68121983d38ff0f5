//! Configuration System
//!
//! Layered configuration loading: defaults, then `config/config.toml` under the
//! workspace root, then `config/{SCRIBE_ENV}.toml` for environment-specific
//! overrides. Deserialized with serde and validated before use.

use crate::error::ControllerError;
use crate::logging::LoggingConfig;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScribeConfig {
    /// Catalog source: newline-delimited list of work-item identifiers.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Progress ledger: append-only list of completed identifiers.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Root directory for generated artifacts.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Master system prompt file for the live generator (optional; a built-in
    /// prompt is used when absent).
    #[serde(default)]
    pub prompt_path: Option<PathBuf>,

    /// Selection engine settings
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Generator collaborator settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.txt")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("completed.txt")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            ledger_path: default_ledger_path(),
            output_root: default_output_root(),
            prompt_path: None,
            selection: SelectionConfig::default(),
            generator: GeneratorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Selection engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Enable the 1-or-2 rule: pair a second item with a batchable primary pick.
    #[serde(default = "default_true")]
    pub batch_small_items: bool,

    /// Identifiers considered small enough to batch. An explicit configuration
    /// input, not a constant embedded in selection logic.
    #[serde(default)]
    pub small_items: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            batch_small_items: default_true(),
            small_items: Vec::new(),
        }
    }
}

impl SelectionConfig {
    pub fn small_item_set(&self) -> HashSet<String> {
        self.small_items.iter().cloned().collect()
    }
}

/// Generator collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Use the deterministic mock generator instead of the live service.
    #[serde(default)]
    pub mock: bool,

    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key. The key itself is never
    /// stored in configuration files.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout for the live generator call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    6000
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mock: false,
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    /// Read the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, ControllerError> {
        std::env::var(&self.api_key_env).map_err(|_| {
            ControllerError::ConfigError(format!(
                "API key environment variable '{}' is not set (required for live runs; \
                 use --mock to run without it)",
                self.api_key_env
            ))
        })
    }
}

impl ScribeConfig {
    /// Validate the configuration before use.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ControllerError::ConfigError(
                "catalog_path cannot be empty".to_string(),
            ));
        }
        if self.ledger_path.as_os_str().is_empty() {
            return Err(ControllerError::ConfigError(
                "ledger_path cannot be empty".to_string(),
            ));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ControllerError::ConfigError(
                "output_root cannot be empty".to_string(),
            ));
        }
        if self.generator.model.trim().is_empty() {
            return Err(ControllerError::ConfigError(
                "generator.model cannot be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(ControllerError::ConfigError(format!(
                "generator.temperature must be within 0.0-2.0, got {}",
                self.generator.temperature
            )));
        }
        Ok(())
    }

    /// Resolve a configured path against the workspace root. Absolute paths
    /// are used as-is.
    pub fn resolve_path(workspace_root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace_root.join(path)
        }
    }
}

/// Configuration loader facade
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence: `config/config.toml` (base) then `config/{SCRIBE_ENV}.toml`
    /// (environment-specific, default environment "development"). Missing files
    /// fall through to defaults.
    pub fn load(workspace_root: &Path) -> Result<ScribeConfig, ControllerError> {
        let config_dir = workspace_root.join("config");
        let env_name = std::env::var("SCRIBE_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder();

        let base_path = config_dir.join("config.toml");
        if base_path.exists() {
            builder = builder.add_source(File::from(base_path).required(false));
        }
        let env_path = config_dir.join(format!("{}.toml", env_name));
        if env_path.exists() {
            builder = builder.add_source(File::from(env_path).required(false));
        }

        let config: ScribeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path (overrides default
    /// workspace loading). The file must exist.
    pub fn load_from_file(path: &Path) -> Result<ScribeConfig, ControllerError> {
        if !path.exists() {
            return Err(ControllerError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let config: ScribeConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let config = ScribeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("catalog.txt"));
        assert!(config.selection.batch_small_items);
        assert!(!config.generator.mock);
    }

    #[test]
    fn load_uses_defaults_when_no_config_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.generator.model, "gpt-4o-mini");
    }

    #[test]
    fn load_reads_workspace_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            r#"
catalog_path = "items.txt"

[selection]
small_items = ["Lua", "Zig"]

[generator]
mock = true
model = "test-model"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("items.txt"));
        assert!(config.generator.mock);
        assert_eq!(config.generator.model, "test-model");
        assert!(config.selection.small_item_set().contains("Lua"));
        // Untouched sections keep their defaults.
        assert_eq!(config.ledger_path, PathBuf::from("completed.txt"));
    }

    #[test]
    fn load_from_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ControllerError::ConfigError(_)));
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let mut config = ScribeConfig::default();
        config.generator.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_path_keeps_absolute_paths() {
        let root = Path::new("/workspace");
        assert_eq!(
            ScribeConfig::resolve_path(root, Path::new("catalog.txt")),
            PathBuf::from("/workspace/catalog.txt")
        );
        assert_eq!(
            ScribeConfig::resolve_path(root, Path::new("/abs/catalog.txt")),
            PathBuf::from("/abs/catalog.txt")
        );
    }
}

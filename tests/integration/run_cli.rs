//! End-to-end CLI tests: run, status, and validate against a real workspace
//! directory, always through the mock generator.

use scribe::cli::{Commands, RunContext};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Workspace with a three-item catalog where the first item is batchable.
fn workspace(catalog: &str, small_items: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("catalog.txt"), catalog).unwrap();
    let config_dir = dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let small = small_items
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "[selection]\nsmall_items = [{}]\n\n[generator]\nmock = true\n\n[logging]\nenabled = false\n",
            small
        ),
    )
    .unwrap();
    dir
}

fn context(dir: &TempDir) -> RunContext {
    RunContext::new(dir.path().to_path_buf(), None).unwrap()
}

fn run_command() -> Commands {
    Commands::Run {
        mock: false,
        no_batch: false,
        item: None,
        dry_run: false,
    }
}

fn ledger_lines(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("completed.txt"))
        .map(|raw| raw.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn run_generates_artifacts_and_commits_ledger() {
    let dir = workspace("lua\npython\nrust\n", &["lua"]);
    let output = context(&dir).execute(&run_command()).unwrap();

    // Batchable primary pulls the next item into the same run.
    assert!(output.contains("Processed 2 item(s)"));
    assert_eq!(ledger_lines(&dir), vec!["lua", "python"]);
    assert!(dir.path().join("output/Lua/book.md").exists());
    assert!(dir.path().join("output/Python/book.md").exists());
    assert!(!dir.path().join("output/Rust/book.md").exists());
}

#[test]
fn consecutive_runs_resume_until_complete() {
    let dir = workspace("lua\npython\nrust\n", &["lua"]);
    let ctx = context(&dir);

    ctx.execute(&run_command()).unwrap();
    ctx.execute(&run_command()).unwrap();
    assert_eq!(ledger_lines(&dir), vec!["lua", "python", "rust"]);

    // Terminal state is a clean no-op, not an error.
    let output = ctx.execute(&run_command()).unwrap();
    assert!(output.contains("Nothing to do"));
    assert_eq!(ledger_lines(&dir), vec!["lua", "python", "rust"]);
}

#[test]
fn no_batch_flag_limits_run_to_one_item() {
    let dir = workspace("lua\npython\n", &["lua"]);
    let output = context(&dir)
        .execute(&Commands::Run {
            mock: false,
            no_batch: true,
            item: None,
            dry_run: false,
        })
        .unwrap();
    assert!(output.contains("Processed 1 item(s)"));
    assert_eq!(ledger_lines(&dir), vec!["lua"]);
}

#[test]
fn dry_run_previews_selection_without_side_effects() {
    let dir = workspace("lua\npython\n", &["lua"]);
    let output = context(&dir)
        .execute(&Commands::Run {
            mock: false,
            no_batch: false,
            item: None,
            dry_run: true,
        })
        .unwrap();
    assert!(output.contains("Dry run"));
    assert!(output.contains("lua, python"));
    assert!(ledger_lines(&dir).is_empty());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn forced_item_processes_only_that_item() {
    let dir = workspace("lua\npython\nrust\n", &[]);
    let output = context(&dir)
        .execute(&Commands::Run {
            mock: false,
            no_batch: false,
            item: Some("rust".to_string()),
            dry_run: false,
        })
        .unwrap();
    assert!(output.contains("rust"));
    assert_eq!(ledger_lines(&dir), vec!["rust"]);
    assert!(!dir.path().join("output/Lua/book.md").exists());
}

#[test]
fn status_reports_progress_and_next_selection() {
    let dir = workspace("lua\npython\nrust\n", &["lua"]);
    let ctx = context(&dir);
    ctx.execute(&run_command()).unwrap();

    let text = ctx
        .execute(&Commands::Status {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("2/3 complete"));
    assert!(text.contains("rust"));

    let json = ctx
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();
    assert!(json.contains("\"completed\": 2"));
    assert!(json.contains("\"remaining\": 1"));
}

#[test]
fn validate_reports_ok_for_consistent_state() {
    let dir = workspace("lua\npython\n", &[]);
    let ctx = context(&dir);
    ctx.execute(&run_command()).unwrap();

    let output = ctx
        .execute(&Commands::Validate {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("Integrity: OK"));
}

#[test]
fn missing_catalog_fails_with_catalog_error() {
    let dir = TempDir::new().unwrap();
    let err = context(&dir).execute(&run_command()).unwrap_err();
    assert!(err.to_string().contains("Catalog corrupt"));
}

#[test]
fn mock_artifacts_carry_frontmatter_and_heading() {
    let dir = workspace("zig\n", &[]);
    context(&dir).execute(&run_command()).unwrap();
    let content = fs::read_to_string(dir.path().join("output/Zig/book.md")).unwrap();
    assert!(content.starts_with("---"));
    assert!(content.contains("# zig"));
}

#[test]
fn artifact_directories_are_title_cased() {
    let dir = workspace("objective c\n", &[]);
    context(&dir).execute(&run_command()).unwrap();
    assert!(Path::new(&dir.path().join("output/Objective_C/book.md")).exists());
}

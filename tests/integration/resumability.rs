//! Crash-recovery and ledger-integrity scenarios: stale artifacts without a
//! ledger entry, drifted ledgers, and the ledger-subset invariant after a
//! full drain.

use scribe::cli::{Commands, RunContext};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

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
fn stale_artifact_without_ledger_entry_is_regenerated_and_committed() {
    let dir = workspace("lua\n", &[]);

    // A crash between artifact persist and ledger commit leaves exactly this
    // state: the file exists, the ledger does not mention the item.
    let stale_dir = dir.path().join("output/Lua");
    fs::create_dir_all(&stale_dir).unwrap();
    fs::write(stale_dir.join("book.md"), "torn partial output").unwrap();

    context(&dir).execute(&run_command()).unwrap();

    let content = fs::read_to_string(stale_dir.join("book.md")).unwrap();
    assert_ne!(content, "torn partial output");
    assert!(content.contains("# lua"));
    assert_eq!(ledger_lines(&dir), vec!["lua"]);
}

#[test]
fn drifted_ledger_aborts_every_command() {
    let dir = workspace("lua\npython\n", &[]);
    fs::write(dir.path().join("completed.txt"), "lua\nghost\n").unwrap();

    let ctx = context(&dir);
    for command in [
        run_command(),
        Commands::Status {
            format: "text".to_string(),
        },
        Commands::Validate {
            format: "text".to_string(),
        },
    ] {
        let err = ctx.execute(&command).unwrap_err();
        assert!(err.to_string().contains("Ledger corrupt"), "{}", err);
    }

    // The corrupt ledger is never rewritten or repaired automatically.
    assert_eq!(
        fs::read_to_string(dir.path().join("completed.txt")).unwrap(),
        "lua\nghost\n"
    );
}

#[test]
fn unwritable_artifact_directory_aborts_without_commit() {
    let dir = workspace("lua\npython\n", &["lua"]);

    // A regular file occupying the item's artifact directory makes the
    // persist step fail after generation succeeded.
    fs::create_dir_all(dir.path().join("output")).unwrap();
    fs::write(dir.path().join("output/Lua"), "in the way").unwrap();

    let err = context(&dir).execute(&run_command()).unwrap_err();
    assert!(err.to_string().contains("Persistence failed"), "{}", err);
    assert!(err.to_string().contains("lua"));

    // Nothing was committed, not even the second selected item.
    assert!(ledger_lines(&dir).is_empty());
    assert!(!dir.path().join("output/Python").exists());

    // Clearing the obstruction lets a rerun pick up from zero.
    fs::remove_file(dir.path().join("output/Lua")).unwrap();
    context(&dir).execute(&run_command()).unwrap();
    assert_eq!(ledger_lines(&dir), vec!["lua", "python"]);
}

#[test]
fn duplicate_ledger_entries_are_rejected() {
    let dir = workspace("lua\npython\n", &[]);
    fs::write(dir.path().join("completed.txt"), "lua\nlua\n").unwrap();
    let err = context(&dir).execute(&run_command()).unwrap_err();
    assert!(err.to_string().contains("Ledger corrupt"));
}

#[test]
fn full_drain_keeps_ledger_a_duplicate_free_subset_of_catalog() {
    let catalog_ids = ["ada", "basic", "cobol", "d", "elm", "forth"];
    let dir = workspace(&format!("{}\n", catalog_ids.join("\n")), &["basic", "d"]);
    let ctx = context(&dir);

    for _ in 0..catalog_ids.len() {
        let output = ctx.execute(&run_command()).unwrap();
        if output.contains("Nothing to do") {
            break;
        }
    }

    let lines = ledger_lines(&dir);
    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), lines.len(), "ledger has duplicates: {:?}", lines);
    let catalog: HashSet<&str> = catalog_ids.into_iter().collect();
    for id in &lines {
        assert!(catalog.contains(id.as_str()), "{} not in catalog", id);
    }
    assert_eq!(lines.len(), catalog_ids.len());
}

#[test]
fn interrupting_at_any_point_never_loses_committed_progress() {
    let dir = workspace("lua\npython\nrust\n", &["lua"]);

    // First run commits two items.
    context(&dir).execute(&run_command()).unwrap();
    assert_eq!(ledger_lines(&dir), vec!["lua", "python"]);

    // A fresh context (new process) picks up exactly where the ledger says.
    let output = context(&dir).execute(&run_command()).unwrap();
    assert!(output.contains("rust"));
    assert_eq!(ledger_lines(&dir), vec!["lua", "python", "rust"]);
}

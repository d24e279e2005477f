//! CLI integration tests for agent-todos
//!
//! These tests verify the complete workflow from initialization through
//! editing, checking that the instructions file follows every change.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const INSTRUCTIONS: &str = ".github/copilot-instructions.md";

/// Get a command instance for the agent-todos binary
fn todos_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("agent-todos"))
}

/// Create a temporary directory and initialize a workspace
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    todos_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

fn run(dir: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
    todos_cmd().current_dir(dir.path()).args(args).assert()
}

fn instructions(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join(INSTRUCTIONS)).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    todos_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized agent-todos workspace"));

    assert!(dir.path().join(".agent-todos").is_dir());
    assert!(dir.path().join(".agent-todos/config.toml").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    todos_cmd().arg("init").arg(dir.path()).assert().success();
    todos_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_outside_workspace_fail() {
    let dir = TempDir::new().unwrap();

    run(&dir, &["list"])
        .failure()
        .stderr(predicate::str::contains("Run 'agent-todos init' first"));
}

// =============================================================================
// Todo Tests
// =============================================================================

#[test]
fn test_add_writes_instructions_file() {
    let dir = setup_workspace();

    run(&dir, &["add", "Main task", "--id", "todo-1", "-p", "high"])
        .success()
        .stdout(predicate::str::contains("Created todo: todo-1 - Main task"));

    let text = instructions(&dir);
    assert!(text.contains("<todos rule=\"Review steps frequently"));
    assert!(text.contains("- [ ] todo-1: Main task 🔴"));
    assert!(text.contains("</todos>"));
}

#[test]
fn test_add_generates_id() {
    let dir = setup_workspace();

    let output = run(&dir, &["add", "Generated", "--format", "json"]).success();
    let json: Value = serde_json::from_str(&String::from_utf8_lossy(&output.get_output().stdout)).unwrap();
    let id = json["id"].as_str().unwrap();

    assert!(id.starts_with("todo-"));
    assert_eq!(json["priority"], "medium");
    assert!(instructions(&dir).contains(&format!("- [ ] {}: Generated 🟡", id)));
}

#[test]
fn test_duplicate_id_is_rejected() {
    let dir = setup_workspace();

    run(&dir, &["add", "One", "--id", "same"]).success();
    run(&dir, &["add", "Two", "--id", "same"])
        .failure()
        .stderr(predicate::str::contains("Duplicate todo ID"));
}

#[test]
fn test_status_transitions_update_markers() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1"]).success();

    run(&dir, &["start", "t1"]).success();
    assert!(instructions(&dir).contains("- [-] t1: Task 🟡"));

    run(&dir, &["done", "t1"]).success();
    assert!(instructions(&dir).contains("- [x] t1: Task 🟡"));

    run(&dir, &["reset", "t1"]).success();
    assert!(instructions(&dir).contains("- [ ] t1: Task 🟡"));
}

#[test]
fn test_unknown_todo_fails() {
    let dir = setup_workspace();

    run(&dir, &["done", "missing"])
        .failure()
        .stderr(predicate::str::contains("Todo not found: missing"));
}

#[test]
fn test_adr_is_rendered_and_cleared() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1"]).success();

    run(&dir, &["adr", "t1", "Using new API approach"]).success();
    assert!(instructions(&dir).contains("- [ ] t1: Task 🟡\n  _Using new API approach_\n"));

    run(&dir, &["adr", "t1"]).success();
    assert!(!instructions(&dir).contains("_Using new API approach_"));
}

#[test]
fn test_priority_and_move() {
    let dir = setup_workspace();
    run(&dir, &["add", "First", "--id", "a"]).success();
    run(&dir, &["add", "Second", "--id", "b"]).success();

    run(&dir, &["priority", "b", "low"]).success();
    run(&dir, &["move", "b", "0"]).success();

    let text = instructions(&dir);
    let b = text.find("- [ ] b: Second 🟢").unwrap();
    let a = text.find("- [ ] a: First 🟡").unwrap();
    assert!(b < a);
}

#[test]
fn test_list_json_preserves_order() {
    let dir = setup_workspace();
    run(&dir, &["add", "First", "--id", "a"]).success();
    run(&dir, &["add", "Second", "--id", "b"]).success();

    let output = run(&dir, &["list", "--format", "json"]).success();
    let json: Value = serde_json::from_str(&String::from_utf8_lossy(&output.get_output().stdout)).unwrap();
    let ids: Vec<_> = json.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();

    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_remove_todo() {
    let dir = setup_workspace();
    run(&dir, &["add", "Gone soon", "--id", "t1"]).success();

    run(&dir, &["remove", "t1"])
        .success()
        .stdout(predicate::str::contains("Removed todo: t1"));
    assert!(!instructions(&dir).contains("Gone soon"));
}

// =============================================================================
// Subtask Tests
// =============================================================================

#[test]
fn test_subtasks_render_after_adr() {
    let dir = setup_workspace();
    run(&dir, &["add", "Complex task", "--id", "todo-1", "-p", "high", "--adr", "Using new API approach"]).success();
    run(&dir, &["start", "todo-1"]).success();
    run(&dir, &["subtask", "add", "todo-1", "Research", "--id", "sub-1"]).success();
    run(&dir, &["subtask", "add", "todo-1", "Implementation", "--id", "sub-2"]).success();
    run(&dir, &["subtask", "done", "todo-1", "sub-1"]).success();

    assert!(instructions(&dir).contains(
        "- [-] todo-1: Complex task 🔴\n  _Using new API approach_\n  - [x] sub-1: Research\n  - [ ] sub-2: Implementation\n"
    ));
}

#[test]
fn test_disabling_subtasks_hides_but_keeps_them() {
    let dir = setup_workspace();
    run(&dir, &["add", "Main task", "--id", "todo-1"]).success();
    run(&dir, &["subtask", "add", "todo-1", "Subtask 1", "--id", "sub-1"]).success();

    run(&dir, &["config", "set", "enable_subtasks", "false"]).success();
    assert!(!instructions(&dir).contains("Subtask 1"));

    run(&dir, &["show", "todo-1"])
        .success()
        .stdout(predicate::str::contains("sub-1: Subtask 1"));

    run(&dir, &["config", "set", "enable_subtasks", "true"]).success();
    assert!(instructions(&dir).contains("  - [ ] sub-1: Subtask 1"));
}

#[test]
fn test_moving_instructions_file_clears_old_block() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join(".github")).unwrap();
    fs::write(dir.path().join(INSTRUCTIONS), "# Project rules\n").unwrap();
    run(&dir, &["add", "Main task", "--id", "todo-1"]).success();
    assert!(instructions(&dir).contains("todo-1"));

    run(&dir, &["config", "set", "instructions_file", "AGENTS.md"]).success();

    assert_eq!(instructions(&dir), "# Project rules\n");
    let moved = fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
    assert!(moved.contains("- [ ] todo-1: Main task 🟡"));

    run(&dir, &["config", "set", "instructions_file", "AGENTS.md"]).success();
    assert!(fs::read_to_string(dir.path().join("AGENTS.md"))
        .unwrap()
        .contains("todo-1"));
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = setup_workspace();

    run(&dir, &["config", "set", "enable_subtasks", "maybe"]).failure();
    run(&dir, &["config", "set", "colour", "blue"])
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn test_subtask_undo_and_remove() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1"]).success();
    run(&dir, &["subtask", "add", "t1", "Step", "--id", "s1"]).success();
    run(&dir, &["subtask", "done", "t1", "s1"]).success();
    run(&dir, &["subtask", "undo", "t1", "s1"]).success();
    assert!(instructions(&dir).contains("  - [ ] s1: Step"));

    run(&dir, &["subtask", "remove", "t1", "s1"]).success();
    assert!(!instructions(&dir).contains("s1: Step"));

    run(&dir, &["subtask", "done", "t1", "s1"])
        .failure()
        .stderr(predicate::str::contains("Subtask not found"));
}

// =============================================================================
// Document Tests
// =============================================================================

#[test]
fn test_sync_preserves_existing_instructions() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join(".github")).unwrap();
    fs::write(dir.path().join(INSTRUCTIONS), "# Project rules\n\nUse tabs.\n").unwrap();

    run(&dir, &["add", "Task", "--id", "t1"]).success();
    run(&dir, &["add", "Other", "--id", "t2"]).success();

    let text = instructions(&dir);
    assert!(text.starts_with("# Project rules\n\nUse tabs.\n\n<todos"));
    assert_eq!(text.matches("<todos").count(), 1);

    run(&dir, &["sync"])
        .success()
        .stdout(predicate::str::contains("is up to date"));
}

#[test]
fn test_render_prints_block() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1", "-p", "low"]).success();

    run(&dir, &["render"])
        .success()
        .stdout(predicate::str::contains("- [ ] t1: Task 🟢"))
        .stdout(predicate::str::contains("</todos>"));
}

#[test]
fn test_import_reads_hand_edited_block() {
    let dir = setup_workspace();
    run(&dir, &["add", "Old", "--id", "old"]).success();

    let edited = String::from(
        "# Notes\n\n<todos rule=\"anything\">\n- [x] todo-1: Main task 🔴\n  _Architecture decision record here_\n  - [ ] subtask-1: Subtask 1\n  - [x] subtask-2: Subtask 2\n- [ ] todo-2: Another task 🟡\n</todos>\n"
    );
    fs::write(dir.path().join(INSTRUCTIONS), edited).unwrap();

    run(&dir, &["import"])
        .success()
        .stdout(predicate::str::contains("Imported 2 todos"));

    let output = run(&dir, &["list", "--format", "json"]).success();
    let json: Value = serde_json::from_str(&String::from_utf8_lossy(&output.get_output().stdout)).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["status"], "completed");
    assert_eq!(items[0]["adr"], "Architecture decision record here");
    assert_eq!(items[0]["subtasks"].as_array().unwrap().len(), 2);

    // Import re-renders the block canonically
    assert!(instructions(&dir).contains("<todos rule=\"Review steps frequently"));
    assert!(instructions(&dir).starts_with("# Notes\n"));
}

#[test]
fn test_import_keeps_hidden_subtasks() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1"]).success();
    run(&dir, &["subtask", "add", "t1", "Step", "--id", "s1"]).success();
    run(&dir, &["config", "set", "enable_subtasks", "false"]).success();

    let text = instructions(&dir).replace("- [ ] t1: Task", "- [x] t1: Task");
    fs::write(dir.path().join(INSTRUCTIONS), text).unwrap();

    run(&dir, &["import"]).success();
    run(&dir, &["show", "t1"])
        .success()
        .stdout(predicate::str::contains("completed"))
        .stdout(predicate::str::contains("s1: Step"));
}

#[test]
fn test_import_without_block_fails() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join(".github")).unwrap();
    fs::write(dir.path().join(INSTRUCTIONS), "# Nothing here\n").unwrap();

    run(&dir, &["import"])
        .failure()
        .stderr(predicate::str::contains("No <todos> block"));
}

#[test]
fn test_check_reports_malformed_lines() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join(".github")).unwrap();
    fs::write(
        dir.path().join(INSTRUCTIONS),
        "<todos>\n- [ ] good: Fine 🔴\n- [ ] bad: no emoji\n</todos>\n",
    )
    .unwrap();

    run(&dir, &["check"])
        .failure()
        .stdout(predicate::str::contains("line 3: missing priority emoji"))
        .stderr(predicate::str::contains("1 malformed line(s)"));
}

#[test]
fn test_check_clean_document() {
    let dir = setup_workspace();
    run(&dir, &["add", "Task", "--id", "t1"]).success();

    run(&dir, &["check"])
        .success()
        .stdout(predicate::str::contains("1 todos, no problems found"));
}

#[test]
fn test_clear_removes_block() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join(".github")).unwrap();
    fs::write(dir.path().join(INSTRUCTIONS), "# Keep me\n").unwrap();
    run(&dir, &["add", "Task", "--id", "t1"]).success();

    run(&dir, &["clear"])
        .success()
        .stdout(predicate::str::contains("Removed todos block"));
    assert_eq!(instructions(&dir), "# Keep me\n");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = setup_workspace();

    run(&dir, &["--verbose", "add", "Task", "--id", "t1"])
        .success()
        .stderr(predicate::str::contains("[verbose:sync]"));
}

//! Instructions document CLI commands
//!
//! These commands move the list between the canonical store and the
//! `<todos>` block in the instructions file.

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{SkippedLine, TodoList};
use crate::storage::{ConfigReader, SaveOutcome, TodoDocument, Workspace};

/// Writes the rendered block into the workspace's instructions file
pub(super) fn sync_instructions(
    workspace: &Workspace,
    todos: &TodoList,
    output: &Output,
) -> Result<SaveOutcome> {
    let manager = workspace.manager();
    let outcome = manager.save(todos.items())?;

    output.verbose_ctx(
        "sync",
        &format!(
            "{}: {:?} (subtasks {})",
            manager.document().path().display(),
            outcome,
            if manager.config().subtasks_enabled() { "shown" } else { "hidden" }
        ),
    );

    Ok(outcome)
}

fn describe(skipped: &SkippedLine) -> String {
    format!("line {}: {}: {}", skipped.line, skipped.reason, skipped.text.trim())
}

fn skipped_json(skipped: &[SkippedLine]) -> Vec<serde_json::Value> {
    skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "line": s.line,
                "reason": s.reason.to_string(),
                "text": s.text,
            })
        })
        .collect()
}

/// Prints the block as it would be written
pub fn render(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let todos = workspace.todo_store().read_all()?;
    let block = workspace.manager().render(todos.items());

    if output.is_json() {
        output.data(&serde_json::json!({ "markdown": block }));
    } else {
        println!("{}", block);
    }

    Ok(())
}

pub fn sync(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let todos = workspace.todo_store().read_all()?;
    let path = workspace.instructions_file().path().to_path_buf();

    let message = match sync_instructions(&workspace, &todos, output)? {
        SaveOutcome::Created => format!("Created {}", path.display()),
        SaveOutcome::Updated => format!("Updated {}", path.display()),
        SaveOutcome::Unchanged => format!("{} is up to date", path.display()),
    };
    output.success(&message);

    Ok(())
}

/// Replaces the stored list with the block parsed from the instructions file
pub fn import(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let manager = workspace.manager();
    let path = manager.document().path().to_path_buf();

    if manager.document().read_text()?.is_none() {
        anyhow::bail!("Instructions file not found: {}", path.display());
    }

    let report = manager.load_report()?;
    if !report.found_block {
        anyhow::bail!("No <todos> block found in {}", path.display());
    }

    for skipped in &report.skipped {
        output.warn(&format!("skipped {}", describe(skipped)));
    }

    let store = workspace.todo_store();
    let stored = store.read_all()?;
    // A block rendered without subtasks can't carry them; keep the stored ones
    let keep_subtasks = !workspace.config().subtasks_enabled();

    let mut todos = TodoList::new();
    for mut item in report.items {
        if keep_subtasks {
            if let Some(previous) = stored.get(&item.id) {
                item.subtasks = previous.subtasks.clone();
            }
        }
        todos
            .add(item)
            .with_context(|| format!("Cannot import {}", path.display()))?;
    }

    store.write_all(&todos)?;
    output.verbose_ctx(
        "import",
        &format!("Stored {} todos in {}", todos.len(), store.path().display()),
    );

    // Normalize the document to the canonical rendering
    sync_instructions(&workspace, &todos, output)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "imported": todos.len(),
            "skipped": skipped_json(&report.skipped),
        }));
    } else {
        output.success(&format!(
            "Imported {} todos from {}",
            todos.len(),
            path.display()
        ));
    }

    Ok(())
}

/// Reports lines the parser would skip, failing if there are any
pub fn check(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let manager = workspace.manager();
    let path = manager.document().path().to_path_buf();
    let report = manager.load_report()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "file": path.display().to_string(),
            "found_block": report.found_block,
            "todos": report.items.len(),
            "skipped": skipped_json(&report.skipped),
        }));
    } else if !report.found_block {
        output.warn(&format!("no <todos> block in {}", path.display()));
    } else {
        for skipped in &report.skipped {
            println!("{}", describe(skipped));
        }
    }

    if !report.skipped.is_empty() {
        anyhow::bail!(
            "{} malformed line(s) in {}",
            report.skipped.len(),
            path.display()
        );
    }

    if !output.is_json() && report.found_block {
        output.success(&format!("{} todos, no problems found", report.items.len()));
    }

    Ok(())
}

/// Removes the block from the instructions file
pub fn clear(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let manager = workspace.manager();
    let path = manager.document().path().display().to_string();

    if manager.clear()? {
        output.success(&format!("Removed todos block from {}", path));
    } else {
        output.success(&format!("No todos block in {}", path));
    }

    Ok(())
}

//! Todo item CLI commands

use anyhow::Result;
use chrono::Utc;

use super::document::sync_instructions;
use super::output::Output;
use crate::domain::{new_todo_id, Priority, TodoItem, TodoList, TodoStatus};
use crate::storage::Workspace;

/// Priority as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    #[default]
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

/// Applies `edit` to the stored list, then re-renders the instructions file
pub(super) fn edit_todos<T>(
    output: &Output,
    context: &str,
    edit: impl FnOnce(&mut TodoList) -> Result<T>,
) -> Result<(T, Workspace)> {
    let workspace = Workspace::open_current()?;
    let store = workspace.todo_store();

    let (value, todos) = store.update(edit)?;
    output.verbose_ctx(
        context,
        &format!("Stored {} todos in {}", todos.len(), store.path().display()),
    );

    sync_instructions(&workspace, &todos, output)?;
    Ok((value, workspace))
}

pub fn add(
    output: &Output,
    content: &str,
    priority: Priority,
    id: Option<String>,
    adr: Option<String>,
) -> Result<()> {
    let id = id.unwrap_or_else(|| new_todo_id(content, Utc::now()));
    let mut item = TodoItem::new(id, content.trim()).with_priority(priority);
    item.adr = adr.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    let (item, _) = edit_todos(output, "add", |todos| Ok(todos.add(item)?.clone()))?;

    if output.is_json() {
        output.data(&item);
    } else {
        output.success(&format!("Created todo: {} - {}", item.id, item.content));
    }

    Ok(())
}

pub fn list(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let todos = workspace.todo_store().read_all()?;

    if output.is_json() {
        output.data(&todos.items());
        return Ok(());
    }

    if todos.is_empty() {
        output.success("No todos.");
        return Ok(());
    }

    for item in &todos {
        let progress = if item.subtasks.is_empty() {
            String::new()
        } else {
            format!("{}/{}", item.completed_subtasks(), item.subtasks.len())
        };
        output.row(&[
            item.id.as_str(),
            item.status.as_str(),
            item.priority.as_str(),
            progress.as_str(),
            item.content.as_str(),
        ]);
    }

    Ok(())
}

pub fn show(output: &Output, id: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let todos = workspace.todo_store().read_all()?;

    let item = todos
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Todo not found: {}", id))?;

    if output.is_json() {
        output.data(item);
        return Ok(());
    }

    println!("{}: {}", item.id, item.content);
    println!("Status:   {}", item.status.as_str());
    println!("Priority: {}", item.priority.as_str());
    if let Some(adr) = item.adr_text() {
        println!("ADR:      {}", adr);
    }
    if !item.subtasks.is_empty() {
        println!("Subtasks:");
        for subtask in &item.subtasks {
            println!("  [{}] {}: {}", subtask.status.marker(), subtask.id, subtask.content);
        }
    }

    Ok(())
}

pub fn set_status(output: &Output, id: &str, status: TodoStatus) -> Result<()> {
    edit_todos(output, "status", |todos| Ok(todos.set_status(id, status)?))?;
    output.success(&format!("{} is now {}", id, status.as_str()));
    Ok(())
}

pub fn set_priority(output: &Output, id: &str, priority: Priority) -> Result<()> {
    edit_todos(output, "priority", |todos| Ok(todos.set_priority(id, priority)?))?;
    output.success(&format!("{} priority set to {}", id, priority.as_str()));
    Ok(())
}

pub fn set_adr(output: &Output, id: &str, text: Option<&str>) -> Result<()> {
    edit_todos(output, "adr", |todos| Ok(todos.set_adr(id, text)?))?;

    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(_) => output.success(&format!("Recorded decision for {}", id)),
        None => output.success(&format!("Cleared decision for {}", id)),
    }
    Ok(())
}

pub fn move_to(output: &Output, id: &str, index: usize) -> Result<()> {
    edit_todos(output, "move", |todos| Ok(todos.move_to(id, index)?))?;
    output.success(&format!("Moved {} to position {}", id, index));
    Ok(())
}

pub fn remove(output: &Output, id: &str) -> Result<()> {
    let (item, _) = edit_todos(output, "remove", |todos| Ok(todos.remove(id)?))?;
    output.success(&format!("Removed todo: {} - {}", item.id, item.content));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_arg_maps_to_domain_priority() {
        assert_eq!(Priority::from(PriorityArg::Low), Priority::Low);
        assert_eq!(Priority::from(PriorityArg::Medium), Priority::Medium);
        assert_eq!(Priority::from(PriorityArg::High), Priority::High);
        assert_eq!(Priority::from(PriorityArg::default()), Priority::default());
    }
}

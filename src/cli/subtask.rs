//! Subtask CLI commands

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use super::output::Output;
use super::todo::edit_todos;
use crate::domain::{new_subtask_id, Subtask, SubtaskStatus};
use crate::storage::ConfigReader;

#[derive(Subcommand)]
pub enum SubtaskCommands {
    /// Add a subtask under a todo
    Add {
        /// Parent todo ID
        parent: String,

        /// Subtask content
        content: String,

        /// Use a specific ID instead of a generated one
        #[arg(long)]
        id: Option<String>,
    },

    /// Mark a subtask as completed
    Done {
        /// Parent todo ID
        parent: String,

        /// Subtask ID
        id: String,
    },

    /// Mark a subtask as pending again
    Undo {
        /// Parent todo ID
        parent: String,

        /// Subtask ID
        id: String,
    },

    /// Remove a subtask
    Remove {
        /// Parent todo ID
        parent: String,

        /// Subtask ID
        id: String,
    },
}

pub fn run(cmd: SubtaskCommands, output: &Output) -> Result<()> {
    match cmd {
        SubtaskCommands::Add { parent, content, id } => add(output, &parent, &content, id),
        SubtaskCommands::Done { parent, id } => {
            set_status(output, &parent, &id, SubtaskStatus::Completed)
        }
        SubtaskCommands::Undo { parent, id } => {
            set_status(output, &parent, &id, SubtaskStatus::Pending)
        }
        SubtaskCommands::Remove { parent, id } => remove(output, &parent, &id),
    }
}

fn add(output: &Output, parent: &str, content: &str, id: Option<String>) -> Result<()> {
    let id = id.unwrap_or_else(|| new_subtask_id(content, Utc::now()));
    let subtask = Subtask::new(id, content.trim());

    let (subtask, workspace) = edit_todos(output, "subtask", |todos| {
        todos.add_subtask(parent, subtask.clone())?;
        Ok(subtask)
    })?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "parent": parent,
            "id": subtask.id,
            "content": subtask.content,
            "status": subtask.status,
        }));
    } else {
        output.success(&format!("Created subtask: {}/{} - {}", parent, subtask.id, subtask.content));
        if !workspace.config().subtasks_enabled() {
            output.warn("subtasks are disabled in config; it won't appear in the instructions file");
        }
    }

    Ok(())
}

fn set_status(output: &Output, parent: &str, id: &str, status: SubtaskStatus) -> Result<()> {
    edit_todos(output, "subtask", |todos| {
        Ok(todos.set_subtask_status(parent, id, status)?)
    })?;
    output.success(&format!("{}/{} is now {}", parent, id, status.as_str()));
    Ok(())
}

fn remove(output: &Output, parent: &str, id: &str) -> Result<()> {
    let (subtask, _) = edit_todos(output, "subtask", |todos| Ok(todos.remove_subtask(parent, id)?))?;
    output.success(&format!("Removed subtask: {}/{} - {}", parent, subtask.id, subtask.content));
    Ok(())
}

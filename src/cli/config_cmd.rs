//! Config CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::document::sync_instructions;
use super::output::Output;
use crate::storage::{ConfigError, ConfigReader, TodoManager, Workspace, ENABLE_SUBTASKS};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Set a project configuration value and re-render the instructions file
    ///
    /// Keys: enable_subtasks (true/false), instructions_file (path)
    Set {
        /// Configuration key
        key: String,

        /// New value
        value: String,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output),
        ConfigCommands::Set { key, value } => set(output, &key, &value),
    }
}

fn show(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let config = workspace.config();

    if output.is_json() {
        output.data(&serde_json::json!({
            "enable_subtasks": config.subtasks_enabled(),
            "instructions_file": config.project.instructions_file,
            "root": workspace.root().display().to_string(),
        }));
    } else {
        println!("{} = {}", ENABLE_SUBTASKS, config.subtasks_enabled());
        println!("instructions_file = {}", config.project.instructions_file);
    }

    Ok(())
}

fn set(output: &Output, key: &str, value: &str) -> Result<()> {
    let mut workspace = Workspace::open_current()?;

    match key {
        ENABLE_SUBTASKS => {
            let enabled: bool = value.parse().map_err(|_| {
                ConfigError::Invalid(format!("{} expects true or false, got '{}'", key, value))
            })?;
            workspace.config_mut().project.enable_subtasks = Some(enabled);
        }
        "instructions_file" => {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid("instructions_file must not be empty".to_string()).into());
            }
            let previous = workspace.instructions_file();
            workspace.config_mut().project.instructions_file = value.to_string();

            if previous.path() != workspace.instructions_file().path() {
                let path = previous.path().display().to_string();
                if TodoManager::new(workspace.config(), previous).clear()? {
                    output.verbose_ctx("config", &format!("Removed todos block from {}", path));
                }
            }
        }
        _ => return Err(ConfigError::Invalid(format!("unknown key '{}'", key)).into()),
    }

    workspace.config().save_project()?;
    output.verbose_ctx("config", &format!("Saved {} = {}", key, value));

    let todos = workspace.todo_store().read_all()?;
    sync_instructions(&workspace, &todos, output)?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

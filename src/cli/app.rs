//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::todo::PriorityArg;
use super::{config_cmd, document, subtask, todo};
use crate::domain::TodoStatus;
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "agent-todos")]
#[command(author, version, about = "Keeps an agent's todo list in its instructions file")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Add a todo at the end of the list
    Add {
        /// Todo content (single line)
        content: String,

        /// Priority
        #[arg(long, short, value_enum, default_value = "medium")]
        priority: PriorityArg,

        /// Use a specific ID instead of a generated one
        #[arg(long)]
        id: Option<String>,

        /// Architecture decision note
        #[arg(long)]
        adr: Option<String>,
    },

    /// List todos in order
    List,

    /// Show todo details
    Show {
        /// Todo ID
        id: String,
    },

    /// Mark a todo as in progress
    Start {
        /// Todo ID
        id: String,
    },

    /// Mark a todo as completed
    Done {
        /// Todo ID
        id: String,
    },

    /// Mark a todo as pending again
    Reset {
        /// Todo ID
        id: String,
    },

    /// Change a todo's priority
    Priority {
        /// Todo ID
        id: String,

        /// New priority
        #[arg(value_enum)]
        level: PriorityArg,
    },

    /// Record an architecture decision on a todo (omit text to clear)
    Adr {
        /// Todo ID
        id: String,

        /// Decision text
        text: Option<String>,
    },

    /// Move a todo to a new position (0-based)
    Move {
        /// Todo ID
        id: String,

        /// Target position
        index: usize,
    },

    /// Remove a todo
    Remove {
        /// Todo ID
        id: String,
    },

    /// Manage subtasks
    #[command(subcommand)]
    Subtask(subtask::SubtaskCommands),

    /// Print the <todos> block as it would be written
    Render,

    /// Write the <todos> block into the instructions file
    Sync,

    /// Replace the stored list with the block in the instructions file
    Import,

    /// Report malformed lines in the instructions file's block
    Check,

    /// Remove the <todos> block from the instructions file
    Clear,

    /// Show or change configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("agent-todos starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing workspace at: {}", path));
            let workspace = Workspace::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created directory: {}", workspace.workspace_dir().display()),
            );
            output.success(&format!(
                "Initialized agent-todos workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Add { content, priority, id, adr } => {
            todo::add(&output, &content, priority.into(), id, adr)?
        }
        Commands::List => todo::list(&output)?,
        Commands::Show { id } => todo::show(&output, &id)?,
        Commands::Start { id } => todo::set_status(&output, &id, TodoStatus::InProgress)?,
        Commands::Done { id } => todo::set_status(&output, &id, TodoStatus::Completed)?,
        Commands::Reset { id } => todo::set_status(&output, &id, TodoStatus::Pending)?,
        Commands::Priority { id, level } => todo::set_priority(&output, &id, level.into())?,
        Commands::Adr { id, text } => todo::set_adr(&output, &id, text.as_deref())?,
        Commands::Move { id, index } => todo::move_to(&output, &id, index)?,
        Commands::Remove { id } => todo::remove(&output, &id)?,

        Commands::Subtask(cmd) => subtask::run(cmd, &output)?,

        Commands::Render => document::render(&output)?,
        Commands::Sync => document::sync(&output)?,
        Commands::Import => document::import(&output)?,
        Commands::Check => document::check(&output)?,
        Commands::Clear => document::clear(&output)?,

        Commands::Config(cmd) => config_cmd::run(cmd, &output)?,
    }

    Ok(())
}

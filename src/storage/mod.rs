//! # Storage Layer
//!
//! Persistence for agent-todos with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Todos (canonical) | JSONL (one JSON per line, in order) | `.agent-todos/todos.jsonl` |
//! | Todos (rendered) | `<todos>` markdown block | instructions file, default `.github/copilot-instructions.md` |
//! | Config | TOML | `.agent-todos/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TodoStore`] and [`InstructionsFile`] use file locking (`fs2`)
//! - All writes are atomic (temp file + rename)
//! - Concurrent read-modify-write cycles from separate processes are not
//!   serialized against each other
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a workspace
//! - [`TodoStore`] - Read/write the canonical list as JSONL
//! - [`TodoManager`] - Render into and parse from an instructions document
//! - [`Config`] - Project and global configuration

mod config;
mod document;
mod jsonl;
mod manager;
mod project;

pub use config::{
    Config, ConfigError, ConfigReader, GlobalConfig, OutputFormat, ProjectConfig,
    DEFAULT_INSTRUCTIONS_FILE, ENABLE_SUBTASKS,
};
pub use document::{remove_block, splice_block, InstructionsFile, MemoryDocument, TodoDocument};
pub use jsonl::TodoStore;
pub use manager::{SaveOutcome, TodoManager};
pub use project::{Workspace, WorkspaceError, WORKSPACE_DIR};

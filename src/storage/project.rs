//! Workspace management
//!
//! Handles workspace initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, InstructionsFile, TodoManager, TodoStore};

/// Directory marking a workspace root
pub const WORKSPACE_DIR: &str = ".agent-todos";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in an agent-todos workspace. Run 'agent-todos init' first.")]
    NotInWorkspace,
}

const DEFAULT_CONFIG: &str = r#"# agent-todos configuration

# Render subtasks under their todo items in the instructions file
enable_subtasks = true

# Markdown file the <todos> block is written into (relative to the workspace root)
instructions_file = ".github/copilot-instructions.md"
"#;

/// An agent-todos workspace
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(WORKSPACE_DIR).is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a new workspace at the given path. Existing files are kept.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let dir = root.join(WORKSPACE_DIR);

        fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create {} directory: {}", WORKSPACE_DIR, dir.display())
        })?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.agent-todos` directory path
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the todo store
    pub fn todo_store(&self) -> TodoStore {
        TodoStore::for_project(&self.root)
    }

    /// Returns the instructions file the block is written into
    pub fn instructions_file(&self) -> InstructionsFile {
        InstructionsFile::new(self.root.join(&self.config.project.instructions_file))
    }

    /// Returns a manager wired to this workspace's config and instructions file
    pub fn manager(&self) -> TodoManager<&Config, InstructionsFile> {
        TodoManager::new(&self.config, self.instructions_file())
    }
}

//! Configuration handling for agent-todos
//!
//! Configuration is stored in `.agent-todos/config.toml` (project) and
//! `~/.config/agent-todos/config.toml` (global). Project values win over
//! global ones.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::project::WORKSPACE_DIR;

/// Key that gates subtask rendering
pub const ENABLE_SUBTASKS: &str = "enable_subtasks";

/// Default location of the instructions file, relative to the workspace root
pub const DEFAULT_INSTRUCTIONS_FILE: &str = ".github/copilot-instructions.md";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Key-value view over configuration
pub trait ConfigReader {
    /// Returns the boolean value for `key`, or `None` when unset
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Whether subtasks are rendered into the markdown block (default: true)
    fn subtasks_enabled(&self) -> bool {
        self.get_bool(ENABLE_SUBTASKS).unwrap_or(true)
    }
}

impl<T: ConfigReader + ?Sized> ConfigReader for &T {
    fn get_bool(&self, key: &str) -> Option<bool> {
        (**self).get_bool(key)
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Render subtasks under their todo items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_subtasks: Option<bool>,

    /// Markdown file the todos block is written into
    pub instructions_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            enable_subtasks: None,
            instructions_file: DEFAULT_INSTRUCTIONS_FILE.to_string(),
        }
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.instructions_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "instructions_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Fallback for projects that don't set `enable_subtasks`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_subtasks: Option<bool>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl ConfigReader for Config {
    fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            ENABLE_SUBTASKS => self.project.enable_subtasks.or(self.global.enable_subtasks),
            _ => None,
        }
    }
}

impl Config {
    /// Loads configuration for a specific workspace
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "agent-todos", "agent-todos")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = Self::project_config_path(project_root);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(WORKSPACE_DIR).join("config.toml")
    }

    /// Finds the workspace root by looking for the `.agent-todos/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the workspace root, or an error if not in a workspace
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in an agent-todos workspace. Run 'agent-todos init' first."))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.require_project_root()?;
        let config_path = Self::project_config_path(root);

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}

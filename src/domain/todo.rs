//! Todo domain model
//!
//! A todo list is an ordered sequence of [`TodoItem`]s. Each item carries a
//! ternary status, a priority, an optional architecture-decision note and an
//! ordered list of [`Subtask`]s with a binary status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Subtask not found: {parent}/{id}")]
    SubtaskNotFound { parent: String, id: String },

    #[error("Duplicate todo ID: {0}")]
    DuplicateId(String),

    #[error("Duplicate subtask ID under {parent}: {id}")]
    DuplicateSubtaskId { parent: String, id: String },

    #[error("Invalid todo text: {0}")]
    InvalidText(String),

    #[error("Position {index} is out of range (list has {len} todos)")]
    OutOfRange { index: usize, len: usize },
}

/// Status of a top-level todo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    /// Checkbox marker written between the brackets
    pub fn marker(&self) -> char {
        match self {
            TodoStatus::Pending => ' ',
            TodoStatus::InProgress => '-',
            TodoStatus::Completed => 'x',
        }
    }

    /// Decodes a checkbox marker. Unknown markers read as pending.
    pub fn from_marker(marker: &str) -> Self {
        match marker.trim() {
            "x" | "X" => TodoStatus::Completed,
            "-" => TodoStatus::InProgress,
            _ => TodoStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
        }
    }
}

/// Status of a subtask. Subtasks are either open or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskStatus {
    #[default]
    Pending,
    Completed,
}

impl SubtaskStatus {
    pub fn marker(&self) -> char {
        match self {
            SubtaskStatus::Pending => ' ',
            SubtaskStatus::Completed => 'x',
        }
    }

    /// Decodes a two-state checkbox; anything but `x`/`X` is pending
    pub fn from_marker(marker: &str) -> Self {
        match marker.trim() {
            "x" | "X" => SubtaskStatus::Completed,
            _ => SubtaskStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::Pending => "pending",
            SubtaskStatus::Completed => "completed",
        }
    }
}

/// Priority of a todo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Emoji suffix on a rendered item line
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }

    pub fn from_emoji(emoji: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.emoji() == emoji)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A step inside a todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub status: SubtaskStatus,
}

impl Subtask {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status: SubtaskStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: SubtaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// A single entry in the todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Opaque identifier, preserved verbatim through format/parse
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub status: TodoStatus,

    #[serde(default)]
    pub priority: Priority,

    /// Architecture decision note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adr: Option<String>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl TodoItem {
    /// Creates a pending, medium-priority item with no note or subtasks
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status: TodoStatus::Pending,
            priority: Priority::Medium,
            adr: None,
            subtasks: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_adr(mut self, adr: impl Into<String>) -> Self {
        self.adr = Some(adr.into());
        self
    }

    pub fn with_subtask(mut self, subtask: Subtask) -> Self {
        self.subtasks.push(subtask);
        self
    }

    /// Returns the note if it is present and non-empty
    pub fn adr_text(&self) -> Option<&str> {
        self.adr.as_deref().filter(|a| !a.is_empty())
    }

    pub fn subtask(&self, id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    fn subtask_mut(&mut self, id: &str) -> Result<&mut Subtask, TodoError> {
        let parent = self.id.clone();
        self.subtasks
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TodoError::SubtaskNotFound {
                parent,
                id: id.to_string(),
            })
    }

    /// Number of completed subtasks
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks
            .iter()
            .filter(|s| s.status == SubtaskStatus::Completed)
            .count()
    }
}

/// Rejects text that would break the line-oriented markdown format
fn validate_line(text: &str) -> Result<(), TodoError> {
    if text.contains('\n') || text.contains('\r') {
        return Err(TodoError::InvalidText(
            "text must fit on a single line".to_string(),
        ));
    }
    Ok(())
}

/// Content is parsed back with trailing whitespace trimmed
fn validate_content(text: &str) -> Result<(), TodoError> {
    validate_line(text)?;
    if text.ends_with(char::is_whitespace) {
        return Err(TodoError::InvalidText(format!(
            "'{}' must not end with whitespace",
            text
        )));
    }
    Ok(())
}

/// IDs are parsed back trimmed, so they must already be
fn validate_id(id: &str) -> Result<(), TodoError> {
    validate_line(id)?;
    if id.trim().is_empty() {
        return Err(TodoError::InvalidText("ID must not be empty".to_string()));
    }
    if id.trim() != id {
        return Err(TodoError::InvalidText(format!(
            "ID '{}' must not start or end with whitespace",
            id
        )));
    }
    if id.contains(": ") {
        return Err(TodoError::InvalidText(format!(
            "ID '{}' must not contain ': '",
            id
        )));
    }
    Ok(())
}

/// Ordered todo list with the editing operations the CLI exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList(Vec<TodoItem>);

impl TodoList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.0.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut TodoItem, TodoError> {
        self.0
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    /// Appends an item at the end of the list
    pub fn add(&mut self, item: TodoItem) -> Result<&TodoItem, TodoError> {
        validate_id(&item.id)?;
        validate_content(&item.content)?;
        if let Some(adr) = &item.adr {
            validate_line(adr)?;
        }
        if self.get(&item.id).is_some() {
            return Err(TodoError::DuplicateId(item.id));
        }
        self.0.push(item);
        Ok(&self.0[self.0.len() - 1])
    }

    pub fn set_status(&mut self, id: &str, status: TodoStatus) -> Result<(), TodoError> {
        self.get_mut(id)?.status = status;
        Ok(())
    }

    pub fn set_priority(&mut self, id: &str, priority: Priority) -> Result<(), TodoError> {
        self.get_mut(id)?.priority = priority;
        Ok(())
    }

    /// Sets the note, or clears it when `adr` is `None` or blank
    pub fn set_adr(&mut self, id: &str, adr: Option<&str>) -> Result<(), TodoError> {
        let adr = adr.map(str::trim).filter(|a| !a.is_empty());
        if let Some(text) = adr {
            validate_line(text)?;
        }
        self.get_mut(id)?.adr = adr.map(str::to_string);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<TodoItem, TodoError> {
        let pos = self
            .0
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        Ok(self.0.remove(pos))
    }

    /// Moves an item to `index`, shifting the others
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<(), TodoError> {
        if index >= self.0.len() {
            return Err(TodoError::OutOfRange {
                index,
                len: self.0.len(),
            });
        }
        let item = self.remove(id)?;
        self.0.insert(index, item);
        Ok(())
    }

    pub fn add_subtask(&mut self, parent: &str, subtask: Subtask) -> Result<(), TodoError> {
        validate_id(&subtask.id)?;
        validate_content(&subtask.content)?;
        let item = self.get_mut(parent)?;
        if item.subtask(&subtask.id).is_some() {
            return Err(TodoError::DuplicateSubtaskId {
                parent: parent.to_string(),
                id: subtask.id,
            });
        }
        item.subtasks.push(subtask);
        Ok(())
    }

    pub fn set_subtask_status(
        &mut self,
        parent: &str,
        id: &str,
        status: SubtaskStatus,
    ) -> Result<(), TodoError> {
        self.get_mut(parent)?.subtask_mut(id)?.status = status;
        Ok(())
    }

    pub fn remove_subtask(&mut self, parent: &str, id: &str) -> Result<Subtask, TodoError> {
        let item = self.get_mut(parent)?;
        let pos = item
            .subtasks
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TodoError::SubtaskNotFound {
                parent: parent.to_string(),
                id: id.to_string(),
            })?;
        Ok(item.subtasks.remove(pos))
    }
}

impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

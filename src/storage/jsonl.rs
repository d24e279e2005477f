//! JSONL storage for todos
//!
//! The canonical list is stored in `.agent-todos/todos.jsonl` with one JSON
//! object per line, in display order. Unlike the rendered markdown block it
//! always keeps subtasks. Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::project::WORKSPACE_DIR;
use crate::domain::{TodoItem, TodoList};

/// Store for todo data in JSONL format
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    /// Creates a new todo store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a workspace
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(WORKSPACE_DIR).join("todos.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole list in stored order
    pub fn read_all(&self) -> Result<TodoList> {
        if !self.path.exists() {
            return Ok(TodoList::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open todo store: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on todo store")?;

        let reader = BufReader::new(&file);
        let mut items = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let item: TodoItem = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse todo at line {}", line_num + 1))?;

            items.push(item);
        }

        // Lock is released when file is dropped
        Ok(TodoList::from(items))
    }

    /// Writes the whole list (full rewrite)
    pub fn write_all(&self, todos: &TodoList) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on todo store")?;

            let mut writer = BufWriter::new(&file);

            for item in todos {
                let line = serde_json::to_string(item).context("Failed to serialize todo")?;
                writeln!(writer, "{}", line).context("Failed to write todo")?;
            }

            writer.flush().context("Failed to flush todo store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Reads the list, applies `edit` and writes it back
    pub fn update<T>(&self, edit: impl FnOnce(&mut TodoList) -> Result<T>) -> Result<(T, TodoList)> {
        let mut todos = self.read_all()?;
        let value = edit(&mut todos)?;
        self.write_all(&todos)?;
        Ok((value, todos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, Subtask, TodoStatus};
    use tempfile::TempDir;

    fn make_todo(seq: u32) -> TodoItem {
        TodoItem::new(format!("todo-{}", seq), format!("Todo {}", seq))
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));

        let todos = store.read_all().unwrap();
        assert!(todos.is_empty());
    }

    #[test]
    fn write_and_read_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));

        let todos = TodoList::from(vec![make_todo(3), make_todo(1), make_todo(2)]);
        store.write_all(&todos).unwrap();

        let loaded = store.read_all().unwrap();
        let ids: Vec<_> = loaded.items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["todo-3", "todo-1", "todo-2"]);
    }

    #[test]
    fn subtasks_and_adr_survive_storage() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));

        let todo = make_todo(1)
            .with_status(TodoStatus::InProgress)
            .with_priority(Priority::High)
            .with_adr("Chose JSONL")
            .with_subtask(Subtask::new("sub-1", "Step"));
        store.write_all(&TodoList::from(vec![todo.clone()])).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.items(), &[todo]);
    }

    #[test]
    fn update_applies_edit() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));
        store.write_all(&TodoList::from(vec![make_todo(1)])).unwrap();

        let (_, todos) = store
            .update(|list| Ok(list.set_status("todo-1", TodoStatus::Completed)?))
            .unwrap();
        assert_eq!(todos.get("todo-1").unwrap().status, TodoStatus::Completed);

        let reloaded = store.read_all().unwrap();
        assert_eq!(reloaded.get("todo-1").unwrap().status, TodoStatus::Completed);
    }

    #[test]
    fn failed_update_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));
        store.write_all(&TodoList::from(vec![make_todo(1)])).unwrap();

        let result = store.update(|list| Ok(list.set_status("missing", TodoStatus::Completed)?));
        assert!(result.is_err());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.jsonl");
        fs::write(
            &path,
            "{\"id\":\"a\",\"content\":\"A\"}\n\n{\"id\":\"b\",\"content\":\"B\",\"status\":\"completed\"}\n",
        )
        .unwrap();

        let todos = TodoStore::new(&path).read_all().unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos.get("b").unwrap().status, TodoStatus::Completed);
    }

    #[test]
    fn atomic_write_no_temp_file_left() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.jsonl"));
        store.write_all(&TodoList::from(vec![make_todo(1)])).unwrap();

        assert!(!dir.path().join("todos.jsonl.tmp").exists());
        assert!(store.path().exists());
    }
}

//! Glue between the todo list, configuration and the instructions document
//!
//! [`TodoManager`] owns no state of its own. It reads the subtask flag from a
//! [`ConfigReader`], renders with [`format_todos`] and writes through a
//! [`TodoDocument`]; loading runs the other way through [`parse_report`].

use anyhow::Result;

use super::config::ConfigReader;
use super::document::{remove_block, splice_block, TodoDocument};
use crate::domain::{format_todos, parse_report, ParseReport, TodoItem};

/// Outcome of writing the todos block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document did not exist and was created
    Created,
    /// The document changed
    Updated,
    /// The document already contained the same block
    Unchanged,
}

pub struct TodoManager<C, D> {
    config: C,
    document: D,
}

impl<C: ConfigReader, D: TodoDocument> TodoManager<C, D> {
    pub fn new(config: C, document: D) -> Self {
        Self { config, document }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Renders the block using the configured subtask visibility
    pub fn render(&self, items: &[TodoItem]) -> String {
        format_todos(items, self.config.subtasks_enabled())
    }

    /// Writes the block into the document, preserving surrounding text
    pub fn save(&self, items: &[TodoItem]) -> Result<SaveOutcome> {
        let block = self.render(items);
        let existing = self.document.read_text()?;

        let updated = splice_block(existing.as_deref().unwrap_or(""), &block);
        if existing.as_deref() == Some(updated.as_str()) {
            return Ok(SaveOutcome::Unchanged);
        }

        self.document.write_text(&updated)?;

        Ok(match existing {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Created,
        })
    }

    /// Parses the document's block, keeping the skipped-line diagnostics
    pub fn load_report(&self) -> Result<ParseReport> {
        let text = self.document.read_text()?.unwrap_or_default();
        Ok(parse_report(&text))
    }

    /// Parses the document's block; a missing document or block is an empty list
    pub fn load(&self) -> Result<Vec<TodoItem>> {
        Ok(self.load_report()?.items)
    }

    /// Removes the block from the document. Returns false if there was none.
    pub fn clear(&self) -> Result<bool> {
        let Some(text) = self.document.read_text()? else {
            return Ok(false);
        };

        match remove_block(&text) {
            Some(updated) => {
                self.document.write_text(&updated)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

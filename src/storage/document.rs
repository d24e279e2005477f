//! Text documents holding the rendered todos block
//!
//! The block lives inside a larger markdown file (usually the agent's
//! instructions file). Writing replaces an existing `<todos>` block in place
//! or appends one, leaving the rest of the file untouched.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::markdown::find_block;

/// Read/write access to a text document
pub trait TodoDocument {
    /// Returns the document text, or `None` if it doesn't exist yet
    fn read_text(&self) -> Result<Option<String>>;

    /// Replaces the whole document text
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Puts `block` into `document`, replacing the first existing `<todos>` block
pub fn splice_block(document: &str, block: &str) -> String {
    if let Some(range) = find_block(document) {
        let mut out = String::with_capacity(document.len() + block.len());
        out.push_str(&document[..range.start]);
        out.push_str(block);
        out.push_str(&document[range.end..]);
        return out;
    }

    if document.is_empty() {
        format!("{}\n", block)
    } else if document.ends_with('\n') {
        format!("{}\n{}\n", document, block)
    } else {
        format!("{}\n\n{}\n", document, block)
    }
}

/// Removes the first `<todos>` block, or returns `None` if there is none
pub fn remove_block(document: &str) -> Option<String> {
    let range = find_block(document)?;
    let before = &document[..range.start];
    let after = &document[range.end..];
    let after = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    if !after.is_empty() {
        return Some(format!("{}{}", before, after));
    }

    // Block was at the end: drop the blank line that separated it
    let before = before.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if before.is_empty() {
        Some(String::new())
    } else {
        Some(format!("{}\n", before))
    }
}

/// Markdown file on disk
pub struct InstructionsFile {
    path: PathBuf,
}

impl InstructionsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid document path: {}", self.path.display()))?;
        let mut temp_name = name.to_os_string();
        temp_name.push(".tmp");
        Ok(self.path.with_file_name(temp_name))
    }
}

impl TodoDocument for InstructionsFile {
    fn read_text(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open document: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on document")?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("Failed to read document: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(Some(text))
    }

    fn write_text(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.temp_path()?;

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on document")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(text.as_bytes())
                .context("Failed to write document")?;
            writer.flush().context("Failed to flush document")?;
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
}

/// Document kept in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryDocument {
    text: Mutex<Option<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
        }
    }
}

impl TodoDocument for MemoryDocument {
    fn read_text(&self) -> Result<Option<String>> {
        let text = self
            .text
            .lock()
            .map_err(|_| anyhow::anyhow!("Document lock poisoned"))?;
        Ok(text.clone())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let mut current = self
            .text
            .lock()
            .map_err(|_| anyhow::anyhow!("Document lock poisoned"))?;
        *current = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLOCK: &str = "<todos rule=\"r\">\n- [ ] t1: Task 🔴\n</todos>";

    #[test]
    fn splice_into_empty_document() {
        assert_eq!(splice_block("", BLOCK), format!("{}\n", BLOCK));
    }

    #[test]
    fn splice_appends_after_blank_line() {
        assert_eq!(
            splice_block("# Project\n", BLOCK),
            format!("# Project\n\n{}\n", BLOCK)
        );
        assert_eq!(
            splice_block("# Project", BLOCK),
            format!("# Project\n\n{}\n", BLOCK)
        );
    }

    #[test]
    fn splice_replaces_existing_block_in_place() {
        let doc = "# Project\n\n<todos rule=\"old\">\n- [x] old: Gone 🟢\n</todos>\n\n## Footer\n";
        let spliced = splice_block(doc, BLOCK);

        assert_eq!(spliced, format!("# Project\n\n{}\n\n## Footer\n", BLOCK));
        assert!(!spliced.contains("Gone"));
    }

    #[test]
    fn splice_is_idempotent() {
        let once = splice_block("# Project\n", BLOCK);
        let twice = splice_block(&once, BLOCK);
        assert_eq!(once, twice);
    }

    #[test]
    fn splice_after_unclosed_block_keeps_prose_stable() {
        use crate::domain::{format_todos, parse_todos, TodoItem};

        let dangling = "# Notes\n<todos rule=\"x\">\n- [ ] stale: Old item 🔴\n\nKeep me\n";
        let fresh = vec![TodoItem::new("fresh", "New item")];

        let once = splice_block(dangling, &format_todos(&fresh, true));
        let ids: Vec<_> = parse_todos(&once).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["fresh"]);

        let updated = vec![TodoItem::new("fresh", "Renamed item")];
        let twice = splice_block(&once, &format_todos(&updated, true));
        assert!(twice.contains("Keep me"));
        assert!(twice.starts_with(dangling));
        assert_eq!(parse_todos(&twice), updated);
    }

    #[test]
    fn remove_block_restores_surroundings() {
        let original = "# Project\n";
        let with_block = splice_block(original, BLOCK);
        assert_eq!(remove_block(&with_block).unwrap(), original);

        let middle = format!("# Top\n{}\n## Bottom\n", BLOCK);
        assert_eq!(remove_block(&middle).unwrap(), "# Top\n## Bottom\n");

        assert_eq!(remove_block(&format!("{}\n", BLOCK)).unwrap(), "");
        assert!(remove_block("# nothing").is_none());
    }

    #[test]
    fn file_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let doc = InstructionsFile::new(dir.path().join("missing.md"));
        assert!(doc.read_text().unwrap().is_none());
    }

    #[test]
    fn file_write_creates_parents_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".github").join("copilot-instructions.md");
        let doc = InstructionsFile::new(&path);

        doc.write_text("hello\n").unwrap();

        assert_eq!(doc.read_text().unwrap().as_deref(), Some("hello\n"));
        assert!(!dir.path().join(".github/copilot-instructions.md.tmp").exists());
    }

    #[test]
    fn memory_document_roundtrip() {
        let doc = MemoryDocument::new();
        assert!(doc.read_text().unwrap().is_none());

        doc.write_text("text").unwrap();
        assert_eq!(doc.read_text().unwrap().as_deref(), Some("text"));

        let seeded = MemoryDocument::with_text("seed");
        assert_eq!(seeded.read_text().unwrap().as_deref(), Some("seed"));
    }
}

//! Markdown codec for todo lists
//!
//! The list is rendered as a single tagged block that an agent reads from its
//! instructions file:
//!
//! ```text
//! <todos rule="Review steps frequently ...">
//! - [-] todo-1: Complex task 🔴
//!   _Using new API approach_
//!   - [x] sub-1: Research
//!   - [ ] sub-2: Implementation
//! - [ ] todo-2: Another task 🟢
//! </todos>
//! ```
//!
//! [`format_todos`] and [`parse_todos`] are inverses for any list whose text
//! fields are single-line, whose IDs do not contain `": "` or surrounding
//! whitespace and whose content has no trailing whitespace.
//!
//! Parsing is lenient. A malformed item line is skipped together with the
//! note and subtask lines that follow it, up to the next well-formed item.
//! [`parse_report`] returns those skipped lines for diagnostics.

use std::ops::Range;

use thiserror::Error;

use super::todo::{Priority, Subtask, SubtaskStatus, TodoItem, TodoStatus};

/// Instruction carried in the opening tag's `rule` attribute
pub const RULE: &str = "Review steps frequently throughout the conversation and DO NOT stop between steps unless they explicitly require it.";

pub const CLOSE_TAG: &str = "</todos>";

const OPEN_TAG_START: &str = "<todos";
const ITEM_PREFIX: &str = "- [";
const INDENT: &str = "  ";
const ID_SEPARATOR: &str = ": ";

/// Returns the opening tag line
pub fn open_tag() -> String {
    format!("<todos rule=\"{}\">", RULE)
}

/// Renders a todo list as a `<todos>` block.
///
/// Each item is followed by its note (if any) and then, when
/// `include_subtasks` is set, its subtasks. The block has no trailing newline.
pub fn format_todos(items: &[TodoItem], include_subtasks: bool) -> String {
    let mut out = open_tag();
    out.push('\n');

    for item in items {
        out.push_str(&format!(
            "{}{}] {}{}{} {}\n",
            ITEM_PREFIX,
            item.status.marker(),
            item.id,
            ID_SEPARATOR,
            item.content,
            item.priority.emoji()
        ));

        if let Some(adr) = item.adr_text() {
            out.push_str(&format!("{}_{}_\n", INDENT, adr));
        }

        if include_subtasks {
            for subtask in &item.subtasks {
                out.push_str(&format!(
                    "{}{}{}] {}{}{}\n",
                    INDENT,
                    ITEM_PREFIX,
                    subtask.status.marker(),
                    subtask.id,
                    ID_SEPARATOR,
                    subtask.content
                ));
            }
        }
    }

    out.push_str(CLOSE_TAG);
    out
}

/// Why a line inside the block was skipped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("unterminated checkbox (expected ']')")]
    UnterminatedCheckbox,

    #[error("missing ': ' between ID and content")]
    MissingSeparator,

    #[error("empty ID")]
    EmptyId,

    #[error("missing priority emoji (🔴, 🟡 or 🟢)")]
    MissingPriority,

    #[error("no todo item above to attach to")]
    Orphaned,
}

/// A line that was skipped while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the whole document
    pub line: usize,
    pub text: String,
    pub reason: LineError,
}

/// Result of parsing a document, including skipped lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub items: Vec<TodoItem>,
    pub skipped: Vec<SkippedLine>,
    /// False when the document has no complete `<todos>` block
    pub found_block: bool,
}

fn is_open_tag(line: &str) -> bool {
    line.strip_prefix(OPEN_TAG_START)
        .is_some_and(|rest| rest.starts_with('>') || rest.starts_with(char::is_whitespace))
        && line.ends_with('>')
}

/// Locates the first complete `<todos>` block.
///
/// The range starts at the opening tag line and ends after `</todos>`,
/// excluding the closing line's line break. An opening tag that is never
/// closed is superseded by the next opening tag.
pub fn find_block(text: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if is_open_tag(trimmed) {
            start = Some(offset);
        } else if start.is_some() && trimmed == CLOSE_TAG {
            let content_len = line.trim_end_matches(|c: char| c == '\r' || c == '\n').len();
            return start.map(|s| s..offset + content_len);
        }
        offset += line.len();
    }

    None
}

/// Splits `[<marker>] <rest>` into the marker and the text after it
fn split_checkbox(after_open: &str) -> Result<(&str, &str), LineError> {
    let close = after_open
        .find(']')
        .ok_or(LineError::UnterminatedCheckbox)?;
    let body = &after_open[close + 1..];
    Ok((&after_open[..close], body.strip_prefix(' ').unwrap_or(body)))
}

fn split_id(body: &str) -> Result<(&str, &str), LineError> {
    let (id, rest) = body
        .split_once(ID_SEPARATOR)
        .ok_or(LineError::MissingSeparator)?;
    let id = id.trim();
    if id.is_empty() {
        return Err(LineError::EmptyId);
    }
    Ok((id, rest))
}

fn parse_item_line(after_open: &str) -> Result<TodoItem, LineError> {
    let (marker, body) = split_checkbox(after_open)?;
    let (id, rest) = split_id(body)?;
    let rest = rest.trim_end();

    // Each priority emoji is a single char
    let emoji_start = rest.char_indices().last().map_or(0, |(i, _)| i);
    let (content, emoji) = rest.split_at(emoji_start);
    let priority = Priority::from_emoji(emoji).ok_or(LineError::MissingPriority)?;

    Ok(TodoItem {
        id: id.to_string(),
        content: content.trim_end().to_string(),
        status: TodoStatus::from_marker(marker),
        priority,
        adr: None,
        subtasks: Vec::new(),
    })
}

fn parse_subtask_line(after_open: &str) -> Result<Subtask, LineError> {
    let (marker, body) = split_checkbox(after_open)?;
    let (id, content) = split_id(body)?;

    Ok(Subtask {
        id: id.to_string(),
        content: content.trim_end().to_string(),
        status: SubtaskStatus::from_marker(marker),
    })
}

/// Returns the note text of an `  _note_` line
fn adr_text(indented: &str) -> Option<&str> {
    let line = indented.trim_end();
    if line.len() >= 2 && line.starts_with('_') && line.ends_with('_') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

enum Line<'a> {
    Item(&'a str),
    Adr(&'a str),
    Subtask(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(ITEM_PREFIX) {
        return Line::Item(rest);
    }

    let Some(indented) = line.strip_prefix(INDENT) else {
        return Line::Other;
    };
    // Exactly two spaces; deeper indentation is not part of the grammar
    if indented.starts_with(char::is_whitespace) {
        return Line::Other;
    }

    if let Some(rest) = indented.strip_prefix(ITEM_PREFIX) {
        Line::Subtask(rest)
    } else if let Some(note) = adr_text(indented) {
        Line::Adr(note)
    } else {
        Line::Other
    }
}

fn skip(report: &mut ParseReport, number: usize, text: &str, reason: LineError) {
    report.skipped.push(SkippedLine {
        line: number,
        text: text.to_string(),
        reason,
    });
}

/// Parses the first `<todos>` block, reporting skipped lines
pub fn parse_report(markdown: &str) -> ParseReport {
    let mut report = ParseReport::default();

    let Some(range) = find_block(markdown) else {
        return report;
    };
    report.found_block = true;

    let first_line = markdown[..range.start].lines().count() + 1;
    let block = &markdown[range];

    // Index into `report.items` of the item that owns note and subtask lines
    let mut current: Option<usize> = None;

    // The first line is the opening tag and the last is the closing tag
    let lines: Vec<&str> = block.lines().collect();
    let body = lines.get(1..lines.len().saturating_sub(1)).unwrap_or(&[]);

    for (i, line) in body.iter().enumerate() {
        let number = first_line + 1 + i;

        match classify(line) {
            Line::Item(rest) => match parse_item_line(rest) {
                Ok(item) => {
                    report.items.push(item);
                    current = Some(report.items.len() - 1);
                }
                Err(reason) => {
                    current = None;
                    skip(&mut report, number, line, reason);
                }
            },
            Line::Adr(note) => match current {
                Some(idx) => {
                    report.items[idx].adr = Some(note.to_string()).filter(|n| !n.is_empty());
                }
                None => skip(&mut report, number, line, LineError::Orphaned),
            },
            Line::Subtask(rest) => match (current, parse_subtask_line(rest)) {
                (Some(idx), Ok(subtask)) => report.items[idx].subtasks.push(subtask),
                (None, _) => skip(&mut report, number, line, LineError::Orphaned),
                (Some(_), Err(reason)) => skip(&mut report, number, line, reason),
            },
            Line::Other => {}
        }
    }

    report
}

/// Parses the first `<todos>` block into a todo list.
///
/// Returns an empty list when the document has no complete block.
pub fn parse_todos(markdown: &str) -> Vec<TodoItem> {
    parse_report(markdown).items
}

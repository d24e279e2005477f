//! ID generation for new todos and subtasks
//!
//! Generated IDs look like `todo-7f2b4c1` and `sub-9d3e5f2`. The hash is
//! derived from the content and creation timestamp. IDs read back from a
//! markdown document are opaque and never re-validated against this format.

use chrono::{DateTime, Utc};

pub const TODO_PREFIX: &str = "todo";
pub const SUBTASK_PREFIX: &str = "sub";

/// Generates a 7-character hash from content and timestamp
fn generate_hash(content: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", content, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Generates an ID for a new top-level todo
pub fn new_todo_id(content: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}-{}", TODO_PREFIX, generate_hash(content, timestamp))
}

/// Generates an ID for a new subtask
pub fn new_subtask_id(content: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}-{}", SUBTASK_PREFIX, generate_hash(content, timestamp))
}

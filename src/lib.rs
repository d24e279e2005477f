//! agent-todos - keeps a coding agent's todo list in its instructions file
//!
//! The list is stored canonically as JSONL and rendered as a `<todos>`
//! markdown block inside the agent's instructions file. The block can be
//! hand-edited and parsed back.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    format_todos, parse_todos, Priority, Subtask, SubtaskStatus, TodoItem, TodoList, TodoStatus,
};

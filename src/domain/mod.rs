//! Domain models for agent-todos
//!
//! Contains the todo list model and its markdown codec, without any I/O concerns.

mod id;
mod todo;
pub mod markdown;

pub use id::{new_subtask_id, new_todo_id};
pub use todo::{Priority, Subtask, SubtaskStatus, TodoError, TodoItem, TodoList, TodoStatus};
pub use markdown::{format_todos, parse_report, parse_todos, LineError, ParseReport, SkippedLine};

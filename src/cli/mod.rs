//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup | `init`, `config show` |
//! | Todo | Editing the list | `add`, `start`, `done`, `adr`, `move` |
//! | Subtask | Steps under a todo | `subtask add`, `subtask done` |
//! | Document | Instructions file | `render`, `sync`, `import`, `check`, `clear` |
//!
//! Every command that edits the list re-renders the `<todos>` block in the
//! instructions file.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! agent-todos --verbose sync
//! ```

mod app;
mod config_cmd;
mod document;
mod output;
mod subtask;
mod todo;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use todo::PriorityArg;

//! agent-todos - todo lists for coding agents

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = agent_todos::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

//! CLI support for flux-syntax
//!
//! The binary is a thin layer over these functions so they can be reused by
//! other tools (editors, linters) without going through a process.

mod parse;
mod tokens;

pub use parse::{execute_parse, ParseCommandOptions};
pub use tokens::execute_tokens;

use std::{fs, io, path::PathBuf};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The script failed to parse; one rendered `line:col: message` per entry
    #[error("{}", .0.join("\n"))]
    Parse(Vec<String>),

    #[error("failed to serialize syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    ReadScript { path: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no script provided. Pass it as an argument, as @file, or pipe it to stdin.")]
    NoInput,
}

/// Resolves a script argument: `@path` reads the file, anything else is the
/// script text itself.
pub fn load_script(arg: &str) -> Result<String, CliError> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::ReadScript {
            path: PathBuf::from(path),
            source,
        }),
        None => Ok(arg.to_string()),
    }
}

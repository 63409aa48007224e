//! Parse a script and print its syntax tree

use tracing::debug;

use super::CliError;
use crate::{ParseOptions, Parser, Recovery, Scanner};

/// Options for the parse command
#[derive(Debug, Clone)]
pub struct ParseCommandOptions {
    /// The Flux script text
    pub script: String,
    /// Pretty-print the JSON output
    pub pretty: bool,
    /// Keep parsing after an error and report every one found
    pub recover: bool,
    /// Upper bound on reported errors when recovering
    pub max_errors: usize,
}

impl Default for ParseCommandOptions {
    fn default() -> Self {
        ParseCommandOptions {
            script: String::new(),
            pretty: false,
            recover: false,
            max_errors: ParseOptions::default().max_errors,
        }
    }
}

/// Parses the script and returns the program serialized as JSON.
pub fn execute_parse(options: &ParseCommandOptions) -> Result<String, CliError> {
    let parse_options = ParseOptions {
        recovery: if options.recover {
            Recovery::Synchronize
        } else {
            Recovery::FailFast
        },
        max_errors: options.max_errors,
    };

    let mut parser = Parser::with_options(Scanner::new(&options.script), parse_options);
    match parser.parse_program() {
        Ok(program) => {
            debug!(statements = program.body.len(), "parsed program");
            let json = if options.pretty {
                serde_json::to_string_pretty(&program)?
            } else {
                serde_json::to_string(&program)?
            };
            Ok(json)
        }
        Err(errors) => {
            let scanner = parser.into_source();
            let rendered = errors.iter().map(|e| e.render(&scanner)).collect();
            Err(CliError::Parse(rendered))
        }
    }
}

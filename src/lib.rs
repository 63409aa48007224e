pub mod ast;
pub mod error;
pub mod literals;
pub mod parser;
pub mod scanner;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expression, Pos, Program, Statement, Token, TokenKind};
pub use error::{LiteralError, ParseError, ParseErrorKind, ParseErrors};
pub use parser::{ParseOptions, Parser, Recovery, TokenSource};
pub use scanner::{Position, Scanner};

/// Parses a complete Flux script with the default options.
pub fn parse(src: &str) -> Result<Program, ParseErrors> {
    parse_with_options(src, ParseOptions::default())
}

pub fn parse_with_options(src: &str, options: ParseOptions) -> Result<Program, ParseErrors> {
    Parser::with_options(Scanner::new(src), options).parse_program()
}

//! Parse errors.
//!
//! Nothing in the scanner or parser panics on bad input; every failure is
//! one of these values, carried back through `Result`.

use std::fmt;

use crate::ast::{Pos, TokenKind};
use crate::scanner::{Position, Scanner};

/// A literal whose lexeme has the right shape but no valid value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOverflow(String),

    #[error("invalid float literal {0}")]
    InvalidFloat(String),

    #[error("string literal must be surrounded by quotes")]
    Unquoted,

    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),

    #[error("literal {0} is not valid UTF-8 once byte escapes are decoded")]
    InvalidUtf8(String),

    #[error("invalid regular expression {lexeme}: {reason}")]
    InvalidRegex { lexeme: String, reason: String },

    #[error("malformed duration literal {0}")]
    InvalidDuration(String),

    #[error("duration magnitude in {0} does not fit in 64 bits")]
    DurationOverflow(String),

    #[error("invalid date-time literal {lexeme}: {reason}")]
    InvalidDateTime { lexeme: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("{}", describe_illegal(.lexeme))]
    IllegalToken { lexeme: String },

    #[error(transparent)]
    InvalidLiteral(#[from] LiteralError),

    #[error("pipe destination must be a function call, found {found}")]
    PipeDestinationNotCall { found: &'static str },

    #[error("expected '=>' after empty parameter list")]
    MissingArrow,
}

fn describe_illegal(lexeme: &str) -> String {
    if lexeme.starts_with('"') {
        format!("unterminated string literal or invalid escape: {lexeme}")
    } else if lexeme.starts_with('/') {
        format!("unterminated regex literal: {lexeme}")
    } else {
        format!("invalid token {lexeme:?}")
    }
}

/// A parse failure at a byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({pos})")]
pub struct ParseError {
    pub pos: Pos,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(pos: Pos, kind: ParseErrorKind) -> Self {
        ParseError { pos, kind }
    }

    /// Line and column of the error within the scanner's source.
    pub fn position(&self, scanner: &Scanner<'_>) -> Position {
        scanner.position(self.pos)
    }

    /// Renders the error as `line:column: message`.
    pub fn render(&self, scanner: &Scanner<'_>) -> String {
        format!("{}: {}", self.position(scanner), self.kind)
    }
}

/// One or more parse errors, in source order of discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Returns `None` when `errors` is empty.
    pub fn new(errors: Vec<ParseError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(ParseErrors { errors })
        }
    }

    /// Earlier recovered errors followed by the one that stopped parsing.
    pub(crate) fn ending_with(mut errors: Vec<ParseError>, last: ParseError) -> Self {
        errors.push(last);
        ParseErrors { errors }
    }

    pub fn first(&self) -> &ParseError {
        &self.errors[0]
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        ParseErrors {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first())
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

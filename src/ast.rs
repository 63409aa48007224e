//! # Flux - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) for the
//! Flux query language, a functional language for querying and transforming
//! time series data.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Token kinds and positioned tokens produced by the scanner
//! - **[literals]** - Literal nodes (numbers, strings, regexes, durations, date-times)
//! - **[expressions]** - Expression nodes (references, operations, calls, functions)
//! - **[operators]** - Binary, unary and logical operators
//! - **[statements]** - Statements (declarations, options, returns, blocks)
//! - **[program]** - The root node
//!
//! ## Quick Start
//!
//! ```text
//! from(bucket: "telegraf/autogen")
//!     |> range(start: -1h)
//!     |> filter(fn: (r) => r._measurement == "cpu")
//! ```
//!
//! This query parses into one `ExpressionStatement` holding nested
//! `PipeExpression`s: the outermost pipes into `filter(...)`, and its argument
//! is the pipe into `range(...)`.
//!
//! ## Core Concepts
//!
//! ### Operator Precedence
//!
//! From loosest to tightest binding:
//!
//! ```text
//! and or  <  == != < <= > >= =~ !~  <  * / %  <  + -  <  |>  <  prefix + - not exists  <  call . []
//! ```
//!
//! Every binary level is left associative.
//!
//! ### Pipes
//!
//! The right hand side of `|>` is always a call. [`PipeExpression::call`] is
//! typed as a [`CallExpression`], so the tree cannot hold anything else there.
//!
//! ### Properties
//!
//! Object literals, call arguments and function parameters all use
//! [`Property`]. The value is optional: `{ key }` is shorthand for a
//! property whose value is the identifier of the same name, and a parameter
//! without a value has no default.
//!
//! ## Examples
//!
//! ### Variable declaration
//!
//! ```text
//! a = "hello"
//! ```
//!
//! ### Function literal with a piped-in parameter
//!
//! ```text
//! top = (tables=<-, n) => tables |> sort() |> limit(n: n)
//! ```
//!
//! ### Options
//!
//! ```text
//! option task = {name: "downsample", every: 1h}
//! ```
pub mod tokens;
pub mod literals;
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod program;

pub use tokens::{lookup_keyword, Pos, Token, TokenKind};
pub use literals::{
    DateTimeLiteral, Duration, DurationLiteral, DurationUnit, FloatLiteral, IntegerLiteral,
    PipeLiteral, RegexLiteral, StringLiteral,
};
pub use expressions::{
    ArrayExpression, ArrowBody, ArrowFunctionExpression, BinaryExpression, CallExpression,
    ConditionalExpression, Expression, Identifier, IndexExpression, LogicalExpression,
    MemberExpression, ObjectExpression, PipeExpression, Property, PropertyKey, UnaryExpression,
};
pub use operators::{LogicalOperator, Operator};
pub use statements::{
    BlockStatement, ExpressionStatement, OptionStatement, ReturnStatement, Statement,
    VariableDeclaration,
};
pub use program::Program;

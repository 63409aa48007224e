use serde::Serialize;

use crate::ast::{
    BlockStatement, DateTimeLiteral, DurationLiteral, FloatLiteral, IntegerLiteral,
    LogicalOperator, Operator, PipeLiteral, RegexLiteral, StringLiteral,
};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Every node owns its children; the tree is built once by the parser and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    // References
    /// Identifier
    ///
    /// # Example
    /// ```text
    /// cpu
    /// ```
    Identifier(Identifier),

    // Literals
    #[serde(rename = "IntegerLiteral")]
    Integer(IntegerLiteral),
    #[serde(rename = "FloatLiteral")]
    Float(FloatLiteral),
    #[serde(rename = "StringLiteral")]
    String(StringLiteral),
    #[serde(rename = "RegexpLiteral")]
    Regex(RegexLiteral),
    #[serde(rename = "DurationLiteral")]
    Duration(DurationLiteral),
    #[serde(rename = "DateTimeLiteral")]
    DateTime(DateTimeLiteral),
    PipeLiteral(PipeLiteral),

    // Operations
    /// Prefix operation
    ///
    /// # Examples
    /// ```text
    /// -1h
    /// not r.done
    /// ```
    #[serde(rename = "UnaryExpression")]
    Unary(Box<UnaryExpression>),

    /// Arithmetic or comparison
    ///
    /// # Examples
    /// ```text
    /// a / 2
    /// r._measurement =~ /cpu/
    /// ```
    #[serde(rename = "BinaryExpression")]
    Binary(Box<BinaryExpression>),

    /// `and` / `or`
    #[serde(rename = "LogicalExpression")]
    Logical(Box<LogicalExpression>),

    /// Pipe forward into a call
    ///
    /// # Example
    /// ```text
    /// from() |> range() |> count()
    /// ```
    #[serde(rename = "PipeExpression")]
    Pipe(Box<PipeExpression>),

    #[serde(rename = "CallExpression")]
    Call(Box<CallExpression>),
    #[serde(rename = "MemberExpression")]
    Member(Box<MemberExpression>),
    #[serde(rename = "IndexExpression")]
    Index(Box<IndexExpression>),

    // Composite literals
    /// Array literal
    ///
    /// # Example
    /// ```text
    /// ["cpu", "mem",]
    /// ```
    #[serde(rename = "ArrayExpression")]
    Array(ArrayExpression),

    /// Object literal
    ///
    /// # Example
    /// ```text
    /// {start: -1h, stop}
    /// ```
    #[serde(rename = "ObjectExpression")]
    Object(ObjectExpression),

    /// Function literal
    ///
    /// # Examples
    /// ```text
    /// (r) => r._value > 10
    /// (tables=<-, n=5) => { return tables |> limit(n: n) }
    /// ```
    #[serde(rename = "ArrowFunctionExpression")]
    Arrow(Box<ArrowFunctionExpression>),

    /// `if test then consequent else alternate`
    #[serde(rename = "ConditionalExpression")]
    Conditional(Box<ConditionalExpression>),
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn integer(value: i64) -> Self {
        Expression::Integer(IntegerLiteral { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(StringLiteral {
            value: value.into(),
        })
    }

    /// Name of the node, as used in the serialized tree and diagnostics.
    pub fn node_name(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "Identifier",
            Expression::Integer(_) => "IntegerLiteral",
            Expression::Float(_) => "FloatLiteral",
            Expression::String(_) => "StringLiteral",
            Expression::Regex(_) => "RegexpLiteral",
            Expression::Duration(_) => "DurationLiteral",
            Expression::DateTime(_) => "DateTimeLiteral",
            Expression::PipeLiteral(_) => "PipeLiteral",
            Expression::Unary(_) => "UnaryExpression",
            Expression::Binary(_) => "BinaryExpression",
            Expression::Logical(_) => "LogicalExpression",
            Expression::Pipe(_) => "PipeExpression",
            Expression::Call(_) => "CallExpression",
            Expression::Member(_) => "MemberExpression",
            Expression::Index(_) => "IndexExpression",
            Expression::Array(_) => "ArrayExpression",
            Expression::Object(_) => "ObjectExpression",
            Expression::Arrow(_) => "ArrowFunctionExpression",
            Expression::Conditional(_) => "ConditionalExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    pub operator: Operator,
    pub argument: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    pub operator: Operator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Expression,
    pub right: Expression,
}

/// `argument |> call`: the argument becomes the piped-in input of `call`.
///
/// `call` is a [`CallExpression`] by type, so a pipe into anything else
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeExpression {
    pub argument: Expression,
    pub call: CallExpression,
}

/// Function call with keyword-style arguments
///
/// # Examples
/// ```text
/// range(start: -1h)
/// filter(fn)          // shorthand, value taken from `fn` in scope
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub callee: Expression,
    pub arguments: Vec<Property>,
}

/// Property access by name.
///
/// `a.b` and `a["b"]` both produce a member expression; the second keeps
/// the string key form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    pub object: Expression,
    pub property: PropertyKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyKey {
    Identifier(Identifier),
    String(StringLiteral),
}

impl PropertyKey {
    pub fn name(&self) -> &str {
        match self {
            PropertyKey::Identifier(id) => &id.name,
            PropertyKey::String(s) => &s.value,
        }
    }
}

/// Computed access, `array[index]`, for any index that is not a string literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexExpression {
    pub array: Expression,
    pub index: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpression {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpression {
    pub properties: Vec<Property>,
}

/// `key: value`, or the shorthand `key` with no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: Expression) -> Self {
        Property {
            key: Identifier::new(key),
            value: Some(value),
        }
    }

    pub fn shorthand(key: impl Into<String>) -> Self {
        Property {
            key: Identifier::new(key),
            value: None,
        }
    }
}

/// Parameters are properties: the value, when present, is the default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowFunctionExpression {
    pub params: Vec<Property>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Block(BlockStatement),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalExpression {
    pub test: Expression,
    pub consequent: Expression,
    pub alternate: Expression,
}

use serde::Serialize;

use crate::ast::{Expression, Identifier};

/// Top level or block level statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// Expression evaluated for its value
    ///
    /// # Example
    /// ```text
    /// from(bucket: "telegraf") |> range(start: -1h)
    /// ```
    #[serde(rename = "ExpressionStatement")]
    Expression(ExpressionStatement),

    /// Variable binding
    ///
    /// # Example
    /// ```text
    /// a = "hello"
    /// ```
    #[serde(rename = "VariableDeclaration")]
    Variable(VariableDeclaration),

    /// Option binding
    ///
    /// # Example
    /// ```text
    /// option task = {name: "foo", every: 1h}
    /// ```
    #[serde(rename = "OptionStatement")]
    Option(OptionStatement),

    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),

    /// Nested statement list
    ///
    /// # Example
    /// ```text
    /// { a = 1 return a }
    /// ```
    #[serde(rename = "BlockStatement")]
    Block(BlockStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub id: Identifier,
    pub init: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionStatement {
    pub declaration: VariableDeclaration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub argument: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
}

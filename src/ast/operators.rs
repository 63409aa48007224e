use serde::Serialize;

use crate::ast::TokenKind;

/// Binary and unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    // Multiplicative
    /// Multiplication (`*`)
    #[serde(rename = "*")]
    Multiplication,
    /// Division (`/`)
    #[serde(rename = "/")]
    Division,
    /// Modulo (`%`)
    #[serde(rename = "%")]
    Modulo,

    // Additive, also used as prefix operators
    /// Addition (`+`)
    #[serde(rename = "+")]
    Addition,
    /// Subtraction (`-`)
    #[serde(rename = "-")]
    Subtraction,

    // Comparison
    /// Equal (`==`)
    #[serde(rename = "==")]
    Equal,
    /// Not equal (`!=`)
    #[serde(rename = "!=")]
    NotEqual,
    /// Less than (`<`)
    #[serde(rename = "<")]
    LessThan,
    /// Less than or equal (`<=`)
    #[serde(rename = "<=")]
    LessThanEqual,
    /// Greater than (`>`)
    #[serde(rename = ">")]
    GreaterThan,
    /// Greater than or equal (`>=`)
    #[serde(rename = ">=")]
    GreaterThanEqual,
    /// Regex match (`=~`)
    #[serde(rename = "=~")]
    RegexpMatch,
    /// Regex non-match (`!~`)
    #[serde(rename = "!~")]
    NotRegexpMatch,

    // Prefix only
    /// Logical negation (`not`)
    #[serde(rename = "not")]
    Not,
    /// Existence check (`exists`)
    #[serde(rename = "exists")]
    Exists,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Multiplication => "*",
            Operator::Division => "/",
            Operator::Modulo => "%",
            Operator::Addition => "+",
            Operator::Subtraction => "-",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqual => ">=",
            Operator::RegexpMatch => "=~",
            Operator::NotRegexpMatch => "!~",
            Operator::Not => "not",
            Operator::Exists => "exists",
        }
    }

    pub(crate) fn multiplicative(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Mul => Some(Operator::Multiplication),
            TokenKind::Div => Some(Operator::Division),
            TokenKind::Mod => Some(Operator::Modulo),
            _ => None,
        }
    }

    pub(crate) fn additive(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Add => Some(Operator::Addition),
            TokenKind::Sub => Some(Operator::Subtraction),
            _ => None,
        }
    }

    pub(crate) fn comparison(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(Operator::Equal),
            TokenKind::Neq => Some(Operator::NotEqual),
            TokenKind::Lt => Some(Operator::LessThan),
            TokenKind::Lte => Some(Operator::LessThanEqual),
            TokenKind::Gt => Some(Operator::GreaterThan),
            TokenKind::Gte => Some(Operator::GreaterThanEqual),
            TokenKind::RegexEq => Some(Operator::RegexpMatch),
            TokenKind::RegexNeq => Some(Operator::NotRegexpMatch),
            _ => None,
        }
    }

    pub(crate) fn prefix(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Add => Some(Operator::Addition),
            TokenKind::Sub => Some(Operator::Subtraction),
            TokenKind::Not => Some(Operator::Not),
            TokenKind::Exists => Some(Operator::Exists),
            _ => None,
        }
    }
}

/// Short-circuiting operators, kept apart from [`Operator`] so that a
/// `LogicalExpression` can never carry an arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalOperator {
    /// Logical AND (`and`)
    #[serde(rename = "and")]
    And,
    /// Logical OR (`or`)
    #[serde(rename = "or")]
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }

    pub(crate) fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOperator::And),
            TokenKind::Or => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

use serde::Serialize;

use crate::ast::Statement;

/// A complete parsed source file.
///
/// The body is only appended to while the parser runs and is never
/// modified once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    /// Statements in source order
    pub body: Vec<Statement>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

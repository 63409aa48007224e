//! Dump the token stream of a script

use crate::Scanner;

/// One line per token: `line:col KIND "lexeme"`, ending with the `Eof` token.
pub fn execute_tokens(script: &str) -> Vec<String> {
    let mut scanner = Scanner::new(script);
    let tokens: Vec<_> = scanner.tokens().collect();
    tokens
        .into_iter()
        .map(|tok| format!("{} {:?} {:?}", scanner.position(tok.pos), tok.kind, tok.lexeme))
        .collect()
}

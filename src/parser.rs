//! Recursive-descent parser.
//!
//! The parser pulls tokens from a [`TokenSource`] with at most one token of
//! pushback. Each binary precedence level is a loop: parse the next tighter
//! level, look at one token, fold it in if it is an operator of this level,
//! otherwise push it back and return. Level order alone decides binding
//! strength.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::{
    ast::{
        ArrayExpression, ArrowBody, ArrowFunctionExpression, BinaryExpression, BlockStatement,
        CallExpression, ConditionalExpression, DateTimeLiteral, DurationLiteral, Expression,
        ExpressionStatement, FloatLiteral, Identifier, IndexExpression, IntegerLiteral,
        LogicalExpression, LogicalOperator, MemberExpression, ObjectExpression, OptionStatement,
        Operator, PipeExpression, PipeLiteral, Pos, Program, Property, PropertyKey, RegexLiteral,
        ReturnStatement, Statement, StringLiteral, Token, TokenKind, UnaryExpression,
        VariableDeclaration,
    },
    error::{LiteralError, ParseError, ParseErrorKind, ParseErrors},
    literals,
};

/// Anything the parser can pull tokens from.
///
/// [`crate::Scanner`] is the real implementation; tests substitute a
/// fixture that replays a fixed token list.
pub trait TokenSource<'src> {
    /// Next token, reading `/` at the start of an operand as a regex literal.
    fn scan_with_regex(&mut self) -> Token<'src>;

    /// Next token, reading `/` as division.
    fn scan_no_regex(&mut self) -> Token<'src>;

    /// Pushes the most recent token back. Only one level is supported.
    fn unread(&mut self);
}

impl<'src, T: TokenSource<'src> + ?Sized> TokenSource<'src> for &mut T {
    fn scan_with_regex(&mut self) -> Token<'src> {
        (**self).scan_with_regex()
    }

    fn scan_no_regex(&mut self) -> Token<'src> {
        (**self).scan_no_regex()
    }

    fn unread(&mut self) {
        (**self).unread()
    }
}

/// What to do when a statement fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Stop at the first error.
    #[default]
    FailFast,
    /// Record the error, skip to the next statement boundary and continue.
    Synchronize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub recovery: Recovery,
    /// Parsing stops once this many errors have been collected.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            recovery: Recovery::FailFast,
            max_errors: 64,
        }
    }
}

impl ParseOptions {
    pub fn synchronize() -> Self {
        ParseOptions {
            recovery: Recovery::Synchronize,
            ..ParseOptions::default()
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

pub struct Parser<'src, S> {
    source: S,
    options: ParseOptions,
    errors: Vec<ParseError>,
    halted: bool,
    /// Brackets opened minus brackets closed so far.
    depth: isize,
    /// Depth before the last token was read, restored by `unread`.
    rewind: Option<isize>,
    marker: PhantomData<&'src ()>,
}

impl<'src, S: TokenSource<'src>> Parser<'src, S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: S, options: ParseOptions) -> Self {
        Parser {
            source,
            options,
            errors: Vec::new(),
            halted: false,
            depth: 0,
            rewind: None,
            marker: PhantomData,
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Parses statements until end of input.
    ///
    /// With [`Recovery::Synchronize`] every collected error is returned,
    /// up to [`ParseOptions::max_errors`].
    pub fn parse_program(&mut self) -> std::result::Result<Program, ParseErrors> {
        let result = self.parse_statement_list(TokenKind::Eof);
        let errors = std::mem::take(&mut self.errors);
        match result {
            Ok(body) => match ParseErrors::new(errors) {
                Some(errors) => Err(errors),
                None => Ok(Program { body }),
            },
            Err(err) => Err(ParseErrors::ending_with(errors, err)),
        }
    }

    /// Parses a single expression that must make up the whole input.
    pub fn parse_single_expression(&mut self) -> Result<Expression> {
        let expr = self.parse_expression()?;
        let tok = self.next_no_regex();
        if tok.kind != TokenKind::Eof {
            return Err(self.unexpected(tok, "end of input"));
        }
        Ok(expr)
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn next(&mut self) -> Token<'src> {
        loop {
            let tok = self.source.scan_with_regex();
            if tok.kind != TokenKind::Comment {
                return self.track(tok);
            }
        }
    }

    fn next_no_regex(&mut self) -> Token<'src> {
        loop {
            let tok = self.source.scan_no_regex();
            if tok.kind != TokenKind::Comment {
                return self.track(tok);
            }
        }
    }

    fn track(&mut self, tok: Token<'src>) -> Token<'src> {
        self.rewind = Some(self.depth);
        match tok.kind {
            TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => self.depth += 1,
            TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => self.depth -= 1,
            _ => {}
        }
        tok
    }

    fn unread(&mut self) {
        if let Some(depth) = self.rewind.take() {
            self.depth = depth;
        }
        self.source.unread();
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'src>> {
        let tok = self.next_no_regex();
        if tok.kind != kind {
            return Err(self.unexpected(tok, expected));
        }
        Ok(tok)
    }

    fn unexpected(&self, tok: Token<'src>, expected: &'static str) -> ParseError {
        let kind = match tok.kind {
            TokenKind::Eof => ParseErrorKind::UnexpectedEof { expected },
            TokenKind::Illegal => ParseErrorKind::IllegalToken {
                lexeme: tok.lexeme.to_string(),
            },
            found => ParseErrorKind::UnexpectedToken { expected, found },
        };
        ParseError::new(tok.pos, kind)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parses statements until `closer` (`Eof` for a program, `}` for a
    /// block), consuming the closer.
    fn parse_statement_list(&mut self, closer: TokenKind) -> Result<Vec<Statement>> {
        let mut body = Vec::new();
        loop {
            let tok = self.next();
            if tok.kind == closer {
                return Ok(body);
            }
            if tok.kind == TokenKind::Eof {
                return Err(self.unexpected(tok, "'}'"));
            }
            self.unread();
            let base = self.depth;

            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.recover(err)?;
                    self.synchronize(tok.pos, base, closer);
                }
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let tok = self.next();
        trace!(kind = %tok.kind, pos = tok.pos.offset(), "parse_statement");

        match tok.kind {
            TokenKind::Ident => self.parse_ident_statement(tok),
            TokenKind::Option => self.parse_option_statement(),
            TokenKind::Return => {
                let argument = self.parse_expression()?;
                Ok(Statement::Return(ReturnStatement { argument }))
            }
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            _ => {
                self.unread();
                let expression = self.parse_expression()?;
                Ok(Statement::Expression(ExpressionStatement { expression }))
            }
        }
    }

    /// `ident = expr`, or an expression statement whose first operand is `ident`.
    fn parse_ident_statement(&mut self, ident: Token<'src>) -> Result<Statement> {
        let id = Identifier::new(ident.lexeme);
        let tok = self.next_no_regex();
        if tok.kind == TokenKind::Assign {
            let init = self.parse_expression()?;
            return Ok(Statement::Variable(VariableDeclaration { id, init }));
        }

        self.unread();
        let expression = self.parse_expression_suffix(Expression::Identifier(id))?;
        Ok(Statement::Expression(ExpressionStatement { expression }))
    }

    fn parse_option_statement(&mut self) -> Result<Statement> {
        let name = self.expect(TokenKind::Ident, "option name")?;
        self.expect(TokenKind::Assign, "'='")?;
        let init = self.parse_expression()?;
        Ok(Statement::Option(OptionStatement {
            declaration: VariableDeclaration {
                id: Identifier::new(name.lexeme),
                init,
            },
        }))
    }

    /// Statements up to the closing `}`; the opening brace is already consumed.
    fn parse_block(&mut self) -> Result<BlockStatement> {
        let body = self.parse_statement_list(TokenKind::RBrace)?;
        Ok(BlockStatement { body })
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Records `err` when resynchronizing, or hands it back to stop parsing.
    fn recover(&mut self, err: ParseError) -> Result<()> {
        if self.options.recovery == Recovery::FailFast || self.halted {
            return Err(err);
        }
        if self.errors.len() + 1 >= self.options.max_errors.max(1) {
            debug!(errors = self.errors.len() + 1, "error limit reached, stopping");
            self.halted = true;
            return Err(err);
        }
        debug!(pos = err.pos.offset(), error = %err.kind, "recovering from parse error");
        self.errors.push(err);
        Ok(())
    }

    /// Skips tokens up to the next statement boundary at bracket depth zero:
    /// an identifier, `option` or `return` past `start`, the enclosing
    /// block's `}`, or end of input. The boundary token is left unread.
    ///
    /// `base` is the bracket depth where the failing statement began, so
    /// brackets it opened before the error still count as open.
    fn synchronize(&mut self, start: Pos, base: isize, closer: TokenKind) {
        // Offer the failing token again; a no-op if it was already pushed back.
        self.unread();

        let mut depth = usize::try_from(self.depth - base).unwrap_or(0);
        let stop = loop {
            let tok = self.next();
            match tok.kind {
                TokenKind::Eof => break tok,
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace if depth > 0 => {
                    depth -= 1;
                }
                TokenKind::RBrace if closer == TokenKind::RBrace => break tok,
                TokenKind::Ident | TokenKind::Option | TokenKind::Return
                    if depth == 0 && tok.pos > start =>
                {
                    break tok;
                }
                _ => {}
            }
        };
        debug!(from = start.offset(), to = stop.pos.offset(), "resynchronized");
        self.unread();
    }

    // ------------------------------------------------------------------
    // Expressions, loosest binding first
    // ------------------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<Expression> {
        let expr = self.parse_comparison()?;
        self.parse_logical_suffix(expr)
    }

    /// Continues an expression whose leftmost primary has already been parsed.
    fn parse_expression_suffix(&mut self, expr: Expression) -> Result<Expression> {
        let expr = self.parse_postfix_suffix(expr)?;
        let expr = self.parse_pipe_suffix(expr)?;
        let expr = self.parse_additive_suffix(expr)?;
        let expr = self.parse_multiplicative_suffix(expr)?;
        let expr = self.parse_comparison_suffix(expr)?;
        self.parse_logical_suffix(expr)
    }

    fn parse_logical_suffix(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            let Some(operator) = LogicalOperator::from_token(tok.kind) else {
                self.unread();
                return Ok(left);
            };
            let right = self.parse_comparison()?;
            left = Expression::Logical(Box::new(LogicalExpression {
                operator,
                left,
                right,
            }));
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let expr = self.parse_multiplicative()?;
        self.parse_comparison_suffix(expr)
    }

    fn parse_comparison_suffix(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            let Some(operator) = Operator::comparison(tok.kind) else {
                self.unread();
                return Ok(left);
            };
            let right = self.parse_multiplicative()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let expr = self.parse_additive()?;
        self.parse_multiplicative_suffix(expr)
    }

    fn parse_multiplicative_suffix(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            let Some(operator) = Operator::multiplicative(tok.kind) else {
                self.unread();
                return Ok(left);
            };
            let right = self.parse_additive()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let expr = self.parse_pipe()?;
        self.parse_additive_suffix(expr)
    }

    fn parse_additive_suffix(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            let Some(operator) = Operator::additive(tok.kind) else {
                self.unread();
                return Ok(left);
            };
            let right = self.parse_pipe()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_pipe(&mut self) -> Result<Expression> {
        let expr = self.parse_unary()?;
        self.parse_pipe_suffix(expr)
    }

    fn parse_pipe_suffix(&mut self, mut argument: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            if tok.kind != TokenKind::PipeForward {
                self.unread();
                return Ok(argument);
            }

            let start = self.next();
            self.unread();
            let call = match self.parse_postfix()? {
                Expression::Call(call) => *call,
                other => {
                    return Err(ParseError::new(
                        start.pos,
                        ParseErrorKind::PipeDestinationNotCall {
                            found: other.node_name(),
                        },
                    ));
                }
            };
            argument = Expression::Pipe(Box::new(PipeExpression { argument, call }));
        }
    }

    /// Prefix `+ - not exists`, binding tighter than any binary operator.
    fn parse_unary(&mut self) -> Result<Expression> {
        let tok = self.next();
        if let Some(operator) = Operator::prefix(tok.kind) {
            let argument = self.parse_unary()?;
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                operator,
                argument,
            })));
        }
        self.unread();
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let expr = self.parse_primary()?;
        self.parse_postfix_suffix(expr)
    }

    /// Calls, member access and indexing, applied left to right.
    fn parse_postfix_suffix(&mut self, mut expr: Expression) -> Result<Expression> {
        loop {
            let tok = self.next_no_regex();
            expr = match tok.kind {
                TokenKind::LParen => {
                    let arguments = self.parse_property_list(TokenKind::RParen)?;
                    Expression::Call(Box::new(CallExpression {
                        callee: expr,
                        arguments,
                    }))
                }
                TokenKind::Dot => {
                    let name = self.expect(TokenKind::Ident, "property name")?;
                    Expression::Member(Box::new(MemberExpression {
                        object: expr,
                        property: PropertyKey::Identifier(Identifier::new(name.lexeme)),
                    }))
                }
                TokenKind::LBrack => {
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBrack, "']'")?;
                    match index {
                        // a["b"] is the same access as a.b
                        Expression::String(key) => Expression::Member(Box::new(MemberExpression {
                            object: expr,
                            property: PropertyKey::String(key),
                        })),
                        index => Expression::Index(Box::new(IndexExpression { array: expr, index })),
                    }
                }
                _ => {
                    self.unread();
                    return Ok(expr);
                }
            };
        }
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let tok = self.next();
        let expr = match tok.kind {
            TokenKind::Ident => Expression::Identifier(Identifier::new(tok.lexeme)),
            TokenKind::Int => {
                let value = literal(tok, literals::parse_integer(tok.lexeme))?;
                Expression::Integer(IntegerLiteral { value })
            }
            TokenKind::Float => {
                let value = literal(tok, literals::parse_float(tok.lexeme))?;
                Expression::Float(FloatLiteral { value })
            }
            TokenKind::String => {
                let value = literal(tok, literals::unquote_string(tok.lexeme))?;
                Expression::String(StringLiteral { value })
            }
            TokenKind::Regex => {
                let value = literal(tok, literals::parse_regex(tok.lexeme))?;
                Expression::Regex(RegexLiteral { value })
            }
            TokenKind::Duration => {
                let values = literal(tok, literals::parse_duration(tok.lexeme))?;
                Expression::Duration(DurationLiteral { values })
            }
            TokenKind::Time => {
                let value = literal(tok, literals::parse_date_time(tok.lexeme))?;
                Expression::DateTime(DateTimeLiteral { value })
            }
            TokenKind::PipeReceive => Expression::PipeLiteral(PipeLiteral),
            TokenKind::LBrack => Expression::Array(self.parse_array()?),
            TokenKind::LBrace => Expression::Object(ObjectExpression {
                properties: self.parse_property_list(TokenKind::RBrace)?,
            }),
            TokenKind::LParen => self.parse_paren_or_arrow()?,
            TokenKind::If => self.parse_conditional()?,
            _ => return Err(self.unexpected(tok, "expression")),
        };
        Ok(expr)
    }

    /// Elements up to `]`; the opening bracket is already consumed.
    fn parse_array(&mut self) -> Result<ArrayExpression> {
        let mut elements = Vec::new();
        loop {
            let tok = self.next();
            if tok.kind == TokenKind::RBrack {
                return Ok(ArrayExpression { elements });
            }
            self.unread();
            elements.push(self.parse_expression()?);

            let tok = self.next_no_regex();
            match tok.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrack => return Ok(ArrayExpression { elements }),
                _ => return Err(self.unexpected(tok, "',' or ']'")),
            }
        }
    }

    /// `key: value` or shorthand `key` entries up to `closer`. Used for
    /// object literals and call arguments.
    fn parse_property_list(&mut self, closer: TokenKind) -> Result<Vec<Property>> {
        let mut properties = Vec::new();
        loop {
            let tok = self.next_no_regex();
            if tok.kind == closer {
                return Ok(properties);
            }
            if tok.kind != TokenKind::Ident {
                return Err(self.unexpected(tok, "property key"));
            }
            let key = Identifier::new(tok.lexeme);

            let sep = self.next_no_regex();
            let value = if sep.kind == TokenKind::Colon {
                Some(self.parse_expression()?)
            } else {
                self.unread();
                None
            };
            properties.push(Property { key, value });

            let tok = self.next_no_regex();
            match tok.kind {
                TokenKind::Comma => continue,
                kind if kind == closer => return Ok(properties),
                _ => return Err(self.unexpected(tok, list_end(closer))),
            }
        }
    }

    /// Everything after `(`: a parenthesized expression or an arrow function.
    ///
    /// Looks ahead only as far as needed. `()` must be followed by `=>`;
    /// `(ident)` is a function only if `=>` follows; `(ident =` or
    /// `(ident ,` starts a parameter list. Anything else is a plain
    /// parenthesized expression.
    fn parse_paren_or_arrow(&mut self) -> Result<Expression> {
        let first = self.next();
        match first.kind {
            TokenKind::RParen => {
                let arrow = self.next_no_regex();
                if arrow.kind != TokenKind::Arrow {
                    return Err(ParseError::new(arrow.pos, ParseErrorKind::MissingArrow));
                }
                self.parse_arrow_body(Vec::new())
            }
            TokenKind::Ident => {
                let key = Identifier::new(first.lexeme);
                let second = self.next_no_regex();
                match second.kind {
                    TokenKind::RParen => {
                        let third = self.next_no_regex();
                        if third.kind == TokenKind::Arrow {
                            return self.parse_arrow_body(vec![Property { key, value: None }]);
                        }
                        self.unread();
                        Ok(Expression::Identifier(key))
                    }
                    TokenKind::Assign => {
                        let default = self.parse_expression()?;
                        self.parse_parameters(Property {
                            key,
                            value: Some(default),
                        })
                    }
                    TokenKind::Comma => {
                        self.unread();
                        self.parse_parameters(Property { key, value: None })
                    }
                    _ => {
                        self.unread();
                        let expr = self.parse_expression_suffix(Expression::Identifier(key))?;
                        self.expect(TokenKind::RParen, "')'")?;
                        Ok(expr)
                    }
                }
            }
            _ => {
                self.unread();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
        }
    }

    /// Remaining parameters after the first, then `=>` and the body.
    fn parse_parameters(&mut self, first: Property) -> Result<Expression> {
        let mut params = vec![first];
        loop {
            let tok = self.next_no_regex();
            match tok.kind {
                TokenKind::RParen => break,
                TokenKind::Comma => {}
                _ => return Err(self.unexpected(tok, "',' or ')'")),
            }

            let tok = self.next_no_regex();
            match tok.kind {
                TokenKind::RParen => break,
                TokenKind::Ident => {
                    let key = Identifier::new(tok.lexeme);
                    let next = self.next_no_regex();
                    let value = if next.kind == TokenKind::Assign {
                        Some(self.parse_expression()?)
                    } else {
                        self.unread();
                        None
                    };
                    params.push(Property { key, value });
                }
                _ => return Err(self.unexpected(tok, "parameter name")),
            }
        }

        self.expect(TokenKind::Arrow, "'=>'")?;
        self.parse_arrow_body(params)
    }

    fn parse_arrow_body(&mut self, params: Vec<Property>) -> Result<Expression> {
        let tok = self.next();
        let body = if tok.kind == TokenKind::LBrace {
            ArrowBody::Block(self.parse_block()?)
        } else {
            self.unread();
            ArrowBody::Expression(self.parse_expression()?)
        };
        Ok(Expression::Arrow(Box::new(ArrowFunctionExpression {
            params,
            body,
        })))
    }

    /// `if test then consequent else alternate`; `if` is already consumed.
    fn parse_conditional(&mut self) -> Result<Expression> {
        let test = self.parse_expression()?;
        self.expect(TokenKind::Then, "'then'")?;
        let consequent = self.parse_expression()?;
        self.expect(TokenKind::Else, "'else'")?;
        let alternate = self.parse_expression()?;
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            test,
            consequent,
            alternate,
        })))
    }
}

fn binary(operator: Operator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpression {
        operator,
        left,
        right,
    }))
}

fn list_end(closer: TokenKind) -> &'static str {
    match closer {
        TokenKind::RParen => "',' or ')'",
        TokenKind::RBrace => "',' or '}'",
        TokenKind::RBrack => "',' or ']'",
        _ => "','",
    }
}

/// Attaches the literal token's position to a decoding failure.
fn literal<T>(tok: Token<'_>, value: std::result::Result<T, LiteralError>) -> Result<T> {
    value.map_err(|err| ParseError::new(tok.pos, err.into()))
}

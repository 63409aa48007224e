use std::fmt;

/// Byte offset of a token within the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(pub usize);

impl Pos {
    pub fn offset(self) -> usize {
        self.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}

/// The closed set of token categories produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    /// End of input. Always carries an empty lexeme.
    Eof,

    /// Input that matches no lexical rule: an unknown character, an
    /// unterminated string or regex, or an invalid escape.
    Illegal,

    /// Line comment
    ///
    /// # Examples
    /// ```text
    /// // runs to the end of the line
    /// ```
    Comment,

    // Reserved words
    /// Logical AND (word, not symbol)
    And,
    /// Logical OR (word, not symbol)
    Or,
    /// Logical negation
    ///
    /// # Examples
    /// ```text
    /// not r.done
    /// ```
    Not,
    Empty,
    In,
    Import,
    Package,
    /// Return from a function body block
    Return,
    /// Option declaration
    ///
    /// # Examples
    /// ```text
    /// option now = () => 2018-08-15T13:36:23Z
    /// ```
    Option,
    Builtin,
    Test,
    If,
    Then,
    Else,
    Exists,

    // Identifiers and literals
    /// Identifier
    ///
    /// Starts with a Unicode letter or underscore, followed by letters,
    /// digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// from
    /// _measurement
    /// αβ
    /// ```
    Ident,

    /// Integer literal, `0` or a nonzero digit followed by digits
    Int,

    /// Floating point literal
    ///
    /// # Examples
    /// ```text
    /// 0.
    /// 72.40
    /// .26
    /// ```
    Float,

    /// Double quoted string literal, kept with its quotes and escapes
    String,

    /// Slash delimited regular expression
    ///
    /// # Examples
    /// ```text
    /// /http:\/\/localhost:9999/
    /// ```
    Regex,

    /// Date or date-time literal
    ///
    /// # Examples
    /// ```text
    /// 2018-01-01
    /// 2018-08-15T13:36:23-07:00
    /// ```
    Time,

    /// Duration literal made of magnitude/unit pairs
    ///
    /// # Examples
    /// ```text
    /// 1h15m
    /// 1mo5d
    /// ```
    Duration,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`), only produced in no-regex mode or when no regex literal matches
    Div,
    /// Modulo (`%`)
    Mod,

    // Comparison
    /// Equality (`==`)
    Eq,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    Lte,
    /// Greater than or equal (`>=`)
    Gte,
    /// Inequality (`!=`)
    Neq,
    /// Regex match (`=~`)
    RegexEq,
    /// Regex non-match (`!~`)
    RegexNeq,

    /// Assignment (`=`)
    Assign,

    /// Arrow function body marker (`=>`)
    Arrow,

    /// Pipe forward (`|>`)
    ///
    /// # Examples
    /// ```text
    /// from(bucket: "telegraf") |> range(start: -1h)
    /// ```
    PipeForward,

    /// Pipe receive (`<-`), the default of a piped-in parameter
    ///
    /// # Examples
    /// ```text
    /// (tables=<-) => tables
    /// ```
    PipeReceive,

    // Delimiters
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,
}

impl TokenKind {
    /// Human readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Illegal => "illegal token",
            TokenKind::Comment => "comment",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::Empty => "'empty'",
            TokenKind::In => "'in'",
            TokenKind::Import => "'import'",
            TokenKind::Package => "'package'",
            TokenKind::Return => "'return'",
            TokenKind::Option => "'option'",
            TokenKind::Builtin => "'builtin'",
            TokenKind::Test => "'test'",
            TokenKind::If => "'if'",
            TokenKind::Then => "'then'",
            TokenKind::Else => "'else'",
            TokenKind::Exists => "'exists'",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::String => "string literal",
            TokenKind::Regex => "regex literal",
            TokenKind::Time => "date-time literal",
            TokenKind::Duration => "duration literal",
            TokenKind::Add => "'+'",
            TokenKind::Sub => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Mod => "'%'",
            TokenKind::Eq => "'=='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Lte => "'<='",
            TokenKind::Gte => "'>='",
            TokenKind::Neq => "'!='",
            TokenKind::RegexEq => "'=~'",
            TokenKind::RegexNeq => "'!~'",
            TokenKind::Assign => "'='",
            TokenKind::Arrow => "'=>'",
            TokenKind::PipeForward => "'|>'",
            TokenKind::PipeReceive => "'<-'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrack => "'['",
            TokenKind::RBrack => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Empty
                | TokenKind::In
                | TokenKind::Import
                | TokenKind::Package
                | TokenKind::Return
                | TokenKind::Option
                | TokenKind::Builtin
                | TokenKind::Test
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::Exists
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Maps a reserved word to its token kind.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "empty" => TokenKind::Empty,
        "in" => TokenKind::In,
        "import" => TokenKind::Import,
        "package" => TokenKind::Package,
        "return" => TokenKind::Return,
        "option" => TokenKind::Option,
        "builtin" => TokenKind::Builtin,
        "test" => TokenKind::Test,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "exists" => TokenKind::Exists,
        _ => return None,
    };
    Some(kind)
}

/// A scanned token: where it starts, what it is, and the exact source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub pos: Pos,
    pub kind: TokenKind,
    pub lexeme: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(pos: Pos, kind: TokenKind, lexeme: &'src str) -> Self {
        Token { pos, kind, lexeme }
    }

    /// Byte offset one past the end of the lexeme.
    pub fn end(&self) -> Pos {
        Pos(self.pos.0 + self.lexeme.len())
    }
}

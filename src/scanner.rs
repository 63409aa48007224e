//! Lexical scanner.
//!
//! The scanner turns source text into [`Token`]s on demand. Whether a `/`
//! opens a regex literal or is the division operator depends on where the
//! parser is in the grammar, so every call picks a mode:
//! [`Scanner::scan_with_regex`] at the start of an operand and
//! [`Scanner::scan_no_regex`] right after one. [`Scanner::unread`] steps
//! back over the last token so it can be scanned again, possibly in the
//! other mode.

use std::fmt;

use crate::ast::{lookup_keyword, DurationUnit, Pos, Token, TokenKind};
use crate::parser::TokenSource;

/// 1-based line and column of a byte offset. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

pub struct Scanner<'src> {
    src: &'src str,
    position: usize,
    /// Cursor before the most recent scan.
    reset: usize,
    /// Set by `unread`, cleared by the next scan.
    rewound: bool,
    /// Offsets at which each line starts; `lines[0]` is always 0.
    lines: Vec<usize>,
}

impl<'src> Scanner<'src> {
    pub fn new(src: &'src str) -> Self {
        Scanner {
            src,
            position: 0,
            reset: 0,
            rewound: false,
            lines: vec![0],
        }
    }

    pub fn source(&self) -> &'src str {
        self.src
    }

    /// Scans the next token, reading a leading `/` as the start of a regex literal.
    pub fn scan_with_regex(&mut self) -> Token<'src> {
        self.scan(true)
    }

    /// Scans the next token, reading a leading `/` as division.
    pub fn scan_no_regex(&mut self) -> Token<'src> {
        self.scan(false)
    }

    /// Moves the cursor back to where it was before the last scan.
    ///
    /// Only one token can be pushed back; a second call before the next
    /// scan does nothing.
    pub fn unread(&mut self) {
        if !self.rewound {
            self.position = self.reset;
            self.rewound = true;
        }
    }

    /// Number of lines seen so far.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Translates a token position into a line and column.
    pub fn position(&self, pos: Pos) -> Position {
        let offset = pos.offset().min(self.src.len());
        let line = match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        // Text past the scanned region has no table entries yet.
        let base = self.lines[line];
        let mut line_no = line + 1;
        let mut line_start = base;
        for (i, b) in self.src.as_bytes()[base..offset].iter().enumerate() {
            if *b == b'\n' {
                line_no += 1;
                line_start = base + i + 1;
            }
        }
        Position {
            line: line_no,
            column: offset - line_start + 1,
        }
    }

    /// Iterates over the remaining tokens in regex mode, ending with `Eof`.
    pub fn tokens(&mut self) -> Tokens<'_, 'src> {
        Tokens {
            scanner: self,
            done: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.src[self.position..].chars().next()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.mark_newline(self.position);
            }
            self.position += ch.len_utf8();
        }
    }

    fn advance_by(&mut self, bytes: usize) {
        let end = self.position + bytes;
        while self.position < end {
            self.advance();
        }
    }

    fn mark_newline(&mut self, offset: usize) {
        let next = offset + 1;
        if self.lines.last().is_some_and(|&last| next > last) {
            self.lines.push(next);
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan(&mut self, regex: bool) -> Token<'src> {
        self.reset = self.position;
        self.rewound = false;
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.current_char() else {
            return Token::new(Pos(start), TokenKind::Eof, "");
        };

        let kind = match ch {
            '/' => self.read_slash(regex),
            '"' => self.read_string(),
            '0'..='9' => self.read_number(),
            '.' if self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) => {
                self.read_number()
            }
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            _ => self.read_operator(ch),
        };

        Token::new(Pos(start), kind, &self.src[start..self.position])
    }

    fn read_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        lookup_keyword(&self.src[start..self.position]).unwrap_or(TokenKind::Ident)
    }

    fn read_operator(&mut self, ch: char) -> TokenKind {
        let next = self.byte_at(self.position + 1);
        let (kind, width) = match (ch, next) {
            ('=', Some(b'=')) => (TokenKind::Eq, 2),
            ('=', Some(b'~')) => (TokenKind::RegexEq, 2),
            ('=', Some(b'>')) => (TokenKind::Arrow, 2),
            ('=', _) => (TokenKind::Assign, 1),
            ('!', Some(b'=')) => (TokenKind::Neq, 2),
            ('!', Some(b'~')) => (TokenKind::RegexNeq, 2),
            ('<', Some(b'=')) => (TokenKind::Lte, 2),
            ('<', Some(b'-')) => (TokenKind::PipeReceive, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', Some(b'=')) => (TokenKind::Gte, 2),
            ('>', _) => (TokenKind::Gt, 1),
            ('|', Some(b'>')) => (TokenKind::PipeForward, 2),
            ('+', _) => (TokenKind::Add, 1),
            ('-', _) => (TokenKind::Sub, 1),
            ('*', _) => (TokenKind::Mul, 1),
            ('%', _) => (TokenKind::Mod, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('[', _) => (TokenKind::LBrack, 1),
            (']', _) => (TokenKind::RBrack, 1),
            ('{', _) => (TokenKind::LBrace, 1),
            ('}', _) => (TokenKind::RBrace, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('.', _) => (TokenKind::Dot, 1),
            (':', _) => (TokenKind::Colon, 1),
            _ => {
                self.advance();
                return TokenKind::Illegal;
            }
        };
        self.advance_by(width);
        kind
    }

    /// Comment, regex literal, or division.
    fn read_slash(&mut self, regex: bool) -> TokenKind {
        if self.byte_at(self.position + 1) == Some(b'/') {
            while let Some(ch) = self.current_char() {
                if ch == '\n' {
                    break;
                }
                self.advance();
            }
            return TokenKind::Comment;
        }

        if !regex {
            self.advance();
            return TokenKind::Div;
        }

        match self.regex_len(self.position) {
            Some(len) => {
                self.advance_by(len);
                TokenKind::Regex
            }
            None => {
                while let Some(ch) = self.current_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                TokenKind::Illegal
            }
        }
    }

    /// Length of the regex literal starting at `start`, if it closes on the same line.
    fn regex_len(&self, start: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut i = start + 1;
        let mut body = 0;
        loop {
            match *bytes.get(i)? {
                b'\n' => return None,
                b'/' => {
                    return (body > 0).then_some(i + 1 - start);
                }
                b'\\' => match bytes.get(i + 1) {
                    Some(b'/') | Some(b'\\') => i += 2,
                    Some(b'x') if self.is_hex_pair(i + 2) => i += 4,
                    _ => i += 1,
                },
                _ => i += 1,
            }
            body += 1;
        }
    }

    fn is_hex_pair(&self, offset: usize) -> bool {
        self.byte_at(offset).is_some_and(|b| b.is_ascii_hexdigit())
            && self.byte_at(offset + 1).is_some_and(|b| b.is_ascii_hexdigit())
    }

    fn read_string(&mut self) -> TokenKind {
        self.advance(); // Consume opening quote
        let mut valid = true;

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return if valid { TokenKind::String } else { TokenKind::Illegal };
                }
                '\\' => {
                    let next = self.byte_at(self.position + 1);
                    match next {
                        Some(b'n' | b'r' | b't' | b'\\' | b'"') => self.advance_by(2),
                        Some(b'x') if self.is_hex_pair(self.position + 2) => self.advance_by(4),
                        _ => {
                            // Keep going so the illegal token ends at the closing quote.
                            valid = false;
                            self.advance();
                        }
                    }
                }
                _ => self.advance(),
            }
        }

        TokenKind::Illegal
    }

    /// Longest match among date-time, duration, float and integer.
    fn read_number(&mut self) -> TokenKind {
        let start = self.position;
        let candidates = [
            (TokenKind::Time, self.date_time_len(start)),
            (TokenKind::Duration, self.duration_len(start)),
            (TokenKind::Float, self.float_len(start)),
            (TokenKind::Int, self.int_len(start)),
        ];

        let mut best = (TokenKind::Illegal, 0);
        for (kind, len) in candidates {
            if len > best.1 {
                best = (kind, len);
            }
        }

        if best.1 == 0 {
            // A lone '.' never reaches here; anything else is a digit, which
            // always matches as an integer.
            self.advance();
            return TokenKind::Illegal;
        }
        self.advance_by(best.1);
        best.0
    }

    fn digits_len(&self, start: usize) -> usize {
        self.src.as_bytes()[start.min(self.src.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    fn int_len(&self, start: usize) -> usize {
        match self.byte_at(start) {
            Some(b'0') => 1,
            Some(b'1'..=b'9') => self.digits_len(start),
            _ => 0,
        }
    }

    fn float_len(&self, start: usize) -> usize {
        let whole = self.digits_len(start);
        if self.byte_at(start + whole) != Some(b'.') {
            return 0;
        }
        let fraction = self.digits_len(start + whole + 1);
        if whole == 0 && fraction == 0 {
            return 0;
        }
        whole + 1 + fraction
    }

    fn duration_len(&self, start: usize) -> usize {
        let mut end = start;
        loop {
            let magnitude = self.int_len(end);
            if magnitude == 0 {
                break;
            }
            match DurationUnit::match_prefix(&self.src[end + magnitude..]) {
                Some((_, unit)) => end += magnitude + unit,
                None => break,
            }
        }
        end - start
    }

    fn date_time_len(&self, start: usize) -> usize {
        const DATE: &[u8] = b"dddd-dd-dd";
        const TIME: &[u8] = b"Tdd:dd:dd";
        const OFFSET: &[u8] = b"dd:dd";

        let mut end = start;
        if !self.matches_shape(end, DATE) {
            return 0;
        }
        end += DATE.len();
        if !self.matches_shape(end, TIME) {
            return end - start;
        }
        end += TIME.len();

        let fraction = self.digits_len(end + 1);
        if self.byte_at(end) == Some(b'.') && fraction > 0 {
            end += 1 + fraction;
        }
        match self.byte_at(end) {
            Some(b'Z') => end += 1,
            Some(b'+' | b'-') if self.matches_shape(end + 1, OFFSET) => {
                end += 1 + OFFSET.len();
            }
            _ => {}
        }
        end - start
    }

    /// Matches `shape` at `start`, where `d` stands for any ASCII digit.
    fn matches_shape(&self, start: usize, shape: &[u8]) -> bool {
        shape.iter().enumerate().all(|(i, expected)| match self.byte_at(start + i) {
            Some(b) if *expected == b'd' => b.is_ascii_digit(),
            Some(b) => b == *expected,
            None => false,
        })
    }
}

impl<'src> TokenSource<'src> for Scanner<'src> {
    fn scan_with_regex(&mut self) -> Token<'src> {
        Scanner::scan_with_regex(self)
    }

    fn scan_no_regex(&mut self) -> Token<'src> {
        Scanner::scan_no_regex(self)
    }

    fn unread(&mut self) {
        Scanner::unread(self)
    }
}

/// Iterator returned by [`Scanner::tokens`].
pub struct Tokens<'a, 'src> {
    scanner: &'a mut Scanner<'src>,
    done: bool,
}

impl<'src> Iterator for Tokens<'_, 'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.scanner.scan_with_regex();
        self.done = token.kind == TokenKind::Eof;
        Some(token)
    }
}


#[test]
fn test_keywords() {
    let mut scanner = Scanner::new("and or not return option exists");
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::And);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Or);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Not);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Return);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Option);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Exists);
    assert_eq!(scanner.scan_with_regex().kind, TokenKind::Eof);
}

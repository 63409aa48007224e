//! Decoding of literal lexemes into values.
//!
//! The scanner only guarantees a lexeme has the right shape; these helpers
//! turn it into a value and report anything that still cannot be
//! represented (overflow, bad UTF-8, an invalid regex pattern).

use regex::Regex;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::ast::{Duration, DurationUnit};
use crate::error::LiteralError;

pub fn parse_integer(lexeme: &str) -> Result<i64, LiteralError> {
    lexeme
        .parse::<i64>()
        .map_err(|_| LiteralError::IntegerOverflow(lexeme.to_string()))
}

pub fn parse_float(lexeme: &str) -> Result<f64, LiteralError> {
    lexeme
        .parse::<f64>()
        .map_err(|_| LiteralError::InvalidFloat(lexeme.to_string()))
}

/// Strips the quotes from a string lexeme and decodes its escapes.
pub fn unquote_string(lexeme: &str) -> Result<String, LiteralError> {
    let body = lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(LiteralError::Unquoted)?;

    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'\\') => out.push(b'\\'),
            Some(b'"') => out.push(b'"'),
            Some(b'x') => {
                let byte = hex_byte(bytes, i + 2).ok_or(LiteralError::InvalidEscape('x'))?;
                out.push(byte);
                i += 4;
                continue;
            }
            Some(other) => return Err(LiteralError::InvalidEscape(char::from(*other))),
            None => return Err(LiteralError::InvalidEscape('\\')),
        }
        i += 2;
    }

    String::from_utf8(out).map_err(|_| LiteralError::InvalidUtf8(lexeme.to_string()))
}

/// Compiles a `/.../` lexeme.
///
/// `\/` becomes `/` and `\xHH` escapes of non-ASCII bytes are decoded so
/// multi-byte characters can be written byte by byte. Every other escape,
/// including ASCII `\xHH`, is left for the regex engine.
pub fn parse_regex(lexeme: &str) -> Result<Regex, LiteralError> {
    let body = lexeme
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
        .filter(|body| !body.is_empty())
        .ok_or_else(|| LiteralError::InvalidRegex {
            lexeme: lexeme.to_string(),
            reason: "regex literal must be surrounded by slashes".to_string(),
        })?;

    let bytes = body.as_bytes();
    let mut pattern = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            match bytes.get(i + 1) {
                Some(b'/') => {
                    pattern.push(b'/');
                    i += 2;
                    continue;
                }
                Some(b'\\') => {
                    pattern.extend_from_slice(b"\\\\");
                    i += 2;
                    continue;
                }
                Some(b'x') => {
                    if let Some(byte) = hex_byte(bytes, i + 2).filter(|b| !b.is_ascii()) {
                        pattern.push(byte);
                        i += 4;
                        continue;
                    }
                }
                _ => {}
            }
        }
        pattern.push(bytes[i]);
        i += 1;
    }

    let pattern =
        String::from_utf8(pattern).map_err(|_| LiteralError::InvalidUtf8(lexeme.to_string()))?;
    Regex::new(&pattern).map_err(|err| LiteralError::InvalidRegex {
        lexeme: lexeme.to_string(),
        reason: err.to_string(),
    })
}

/// Splits a duration lexeme into its magnitude/unit pairs.
pub fn parse_duration(lexeme: &str) -> Result<Vec<Duration>, LiteralError> {
    let mut values = Vec::new();
    let mut rest = lexeme;
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(LiteralError::InvalidDuration(lexeme.to_string()));
        }
        let magnitude = rest[..digits]
            .parse::<i64>()
            .map_err(|_| LiteralError::DurationOverflow(lexeme.to_string()))?;
        let (unit, width) = DurationUnit::match_prefix(&rest[digits..])
            .ok_or_else(|| LiteralError::InvalidDuration(lexeme.to_string()))?;
        values.push(Duration { magnitude, unit });
        rest = &rest[digits + width..];
    }

    if values.is_empty() {
        return Err(LiteralError::InvalidDuration(lexeme.to_string()));
    }
    Ok(values)
}

/// Parses a date or date-time lexeme. A bare date is midnight UTC and a
/// time without an offset is taken as UTC.
pub fn parse_date_time(lexeme: &str) -> Result<OffsetDateTime, LiteralError> {
    const DATE_LEN: usize = "2006-01-02".len();
    const DATE_TIME_LEN: usize = "2006-01-02T15:04:05".len();

    let bytes = lexeme.as_bytes();
    let normalized = if bytes.len() == DATE_LEN {
        format!("{lexeme}T00:00:00Z")
    } else if bytes.len() > DATE_TIME_LEN
        && (lexeme.ends_with('Z') || matches!(bytes[bytes.len() - 6], b'+' | b'-'))
    {
        lexeme.to_string()
    } else {
        format!("{lexeme}Z")
    };

    OffsetDateTime::parse(&normalized, &Rfc3339).map_err(|err| LiteralError::InvalidDateTime {
        lexeme: lexeme.to_string(),
        reason: err.to_string(),
    })
}

fn hex_byte(bytes: &[u8], at: usize) -> Option<u8> {
    let hi = char::from(*bytes.get(at)?).to_digit(16)?;
    let lo = char::from(*bytes.get(at + 1)?).to_digit(16)?;
    u8::try_from(hi * 16 + lo).ok()
}

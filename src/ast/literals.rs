//! Literal nodes.
//!
//! Literals hold decoded values, never raw lexemes: strings are unquoted,
//! regexes compiled, and durations split into magnitude/unit pairs.

use regex::Regex;
use serde::{Serialize, Serializer};
use time::OffsetDateTime;

/// Integer literal
///
/// # Example
/// ```text
/// 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegerLiteral {
    pub value: i64,
}

/// Floating point literal
///
/// # Example
/// ```text
/// 2.71828
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatLiteral {
    pub value: f64,
}

/// String literal with escapes already decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    pub value: String,
}

/// Compiled regular expression literal
///
/// Two literals are equal when their patterns are identical.
#[derive(Debug, Clone, Serialize)]
pub struct RegexLiteral {
    #[serde(serialize_with = "serialize_regex")]
    pub value: Regex,
}

impl PartialEq for RegexLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.value.as_str() == other.value.as_str()
    }
}

fn serialize_regex<S: Serializer>(re: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(re.as_str())
}

/// Point in time
///
/// # Examples
/// ```text
/// 2018-01-01                   // midnight UTC
/// 2009-10-15T09:00:00          // UTC
/// 2018-08-15T13:36:23-07:00
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTimeLiteral {
    #[serde(with = "time::serde::rfc3339")]
    pub value: OffsetDateTime,
}

/// Units accepted in a duration literal.
///
/// The microsecond unit may be written `us` or `µs`; both map to
/// [`DurationUnit::Microsecond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DurationUnit {
    #[serde(rename = "y")]
    Year,
    #[serde(rename = "mo")]
    Month,
    #[serde(rename = "w")]
    Week,
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "m")]
    Minute,
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "ms")]
    Millisecond,
    #[serde(rename = "us")]
    Microsecond,
    #[serde(rename = "ns")]
    Nanosecond,
}

impl DurationUnit {
    /// Unit spellings in match order: longer spellings come before any
    /// spelling that is a prefix of them.
    pub const SPELLINGS: [(&'static str, DurationUnit); 11] = [
        ("mo", DurationUnit::Month),
        ("ms", DurationUnit::Millisecond),
        ("us", DurationUnit::Microsecond),
        ("µs", DurationUnit::Microsecond),
        ("ns", DurationUnit::Nanosecond),
        ("y", DurationUnit::Year),
        ("w", DurationUnit::Week),
        ("d", DurationUnit::Day),
        ("h", DurationUnit::Hour),
        ("m", DurationUnit::Minute),
        ("s", DurationUnit::Second),
    ];

    /// Returns the longest unit spelled at the start of `text`, with the
    /// number of bytes it occupies.
    pub fn match_prefix(text: &str) -> Option<(DurationUnit, usize)> {
        Self::SPELLINGS
            .iter()
            .find(|(spelling, _)| text.starts_with(spelling))
            .map(|(spelling, unit)| (*unit, spelling.len()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationUnit::Year => "y",
            DurationUnit::Month => "mo",
            DurationUnit::Week => "w",
            DurationUnit::Day => "d",
            DurationUnit::Hour => "h",
            DurationUnit::Minute => "m",
            DurationUnit::Second => "s",
            DurationUnit::Millisecond => "ms",
            DurationUnit::Microsecond => "us",
            DurationUnit::Nanosecond => "ns",
        }
    }
}

/// One `(magnitude, unit)` pair of a duration literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Duration {
    pub magnitude: i64,
    pub unit: DurationUnit,
}

/// Duration literal, a non-empty ordered list of magnitude/unit pairs
///
/// # Example
/// ```text
/// 1h15m    // [(1, h), (15, m)]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationLiteral {
    pub values: Vec<Duration>,
}

/// The `<-` placeholder for the piped-in argument of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipeLiteral;

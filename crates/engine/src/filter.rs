//! Record predicates.
//!
//! A filter only ever sees `&Record`, so it cannot change the records it
//! inspects. Closures work directly; [`FieldFilter`] covers the common
//! "field equals / starts with / contains / matches" cases and can be parsed
//! from command-line text.

use std::fmt;
use std::str::FromStr;

use apifetch_types::Record;
use apifetch_util::scalar_text;
use regex::Regex;
use thiserror::Error;

/// A pure predicate over a record.
pub trait RecordFilter {
    fn matches(&self, record: &Record) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&Record) -> bool,
{
    fn matches(&self, record: &Record) -> bool {
        self(record)
    }
}

#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("filter '{0}' has no operator; use path=value, path^=prefix, path*=text or path~=regex")]
    MissingOperator(String),

    #[error("filter '{0}' has an empty field path")]
    EmptyPath(String),

    #[error("filter pattern '{pattern}' is not a valid regex: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub enum FilterOp {
    Equals(String),
    StartsWith(String),
    /// Case-insensitive; the needle is stored lowercased.
    Contains(String),
    Matches(Regex),
}

/// Compares one scalar field of a record. Records where the field is missing
/// or not a scalar never match.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    path: String,
    op: FilterOp,
}

impl FieldFilter {
    pub fn equals(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            op: FilterOp::Equals(value.into()),
        }
    }

    pub fn starts_with(path: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            op: FilterOp::StartsWith(prefix.into()),
        }
    }

    pub fn contains(path: impl Into<String>, needle: &str) -> Self {
        Self {
            path: path.into(),
            op: FilterOp::Contains(needle.to_lowercase()),
        }
    }

    pub fn matches_regex(path: impl Into<String>, pattern: &str) -> Result<Self, FilterParseError> {
        let regex = Regex::new(pattern).map_err(|source| FilterParseError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            path: path.into(),
            op: FilterOp::Matches(regex),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn op(&self) -> &FilterOp {
        &self.op
    }
}

impl RecordFilter for FieldFilter {
    fn matches(&self, record: &Record) -> bool {
        let Some(text) = record.get(&self.path).and_then(scalar_text) else {
            return false;
        };
        match &self.op {
            FilterOp::Equals(expected) => text == *expected,
            FilterOp::StartsWith(prefix) => text.starts_with(prefix.as_str()),
            FilterOp::Contains(needle) => text.to_lowercase().contains(needle.as_str()),
            FilterOp::Matches(regex) => regex.is_match(&text),
        }
    }
}

impl FromStr for FieldFilter {
    type Err = FilterParseError;

    /// Parses `path=value`, `path^=prefix`, `path*=text` or `path~=regex`.
    /// The first `=` splits path from value, so values may contain `=`.
    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let (left, value) = expression
            .split_once('=')
            .ok_or_else(|| FilterParseError::MissingOperator(expression.to_string()))?;

        let (path, operator) = match left.char_indices().last() {
            Some((index, marker @ ('^' | '*' | '~'))) => (&left[..index], Some(marker)),
            _ => (left, None),
        };
        let path = path.trim();
        if path.is_empty() {
            return Err(FilterParseError::EmptyPath(expression.to_string()));
        }

        match operator {
            Some('^') => Ok(FieldFilter::starts_with(path, value)),
            Some('*') => Ok(FieldFilter::contains(path, value)),
            Some(_) => FieldFilter::matches_regex(path, value),
            None => Ok(FieldFilter::equals(path, value)),
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            FilterOp::Equals(value) => write!(f, "{} = '{}'", self.path, value),
            FilterOp::StartsWith(prefix) => write!(f, "{} starts with '{}'", self.path, prefix),
            FilterOp::Contains(needle) => write!(f, "{} contains '{}'", self.path, needle),
            FilterOp::Matches(regex) => write!(f, "{} matches /{}/", self.path, regex.as_str()),
        }
    }
}

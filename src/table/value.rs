//! Typed header scalars.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One header entry of a tabular log.
///
/// Numeric tokens containing a `.` are floats, other numeric tokens are
/// integers. Anything that is not a number (the format writes quoted
/// version strings and dates into the header) is kept as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl HeaderValue {
    pub fn parse(token: &str) -> Self {
        let parsed = if token.contains('.') {
            token.parse::<f64>().ok().map(HeaderValue::Float)
        } else {
            token.parse::<i64>().ok().map(HeaderValue::Integer)
        };
        parsed.unwrap_or_else(|| HeaderValue::Text(token.trim_matches('"').to_string()))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Integer(v) => Some(*v as f64),
            HeaderValue::Float(v) => Some(*v),
            HeaderValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Integer(v) => write!(f, "{v}"),
            HeaderValue::Float(v) => write!(f, "{v:?}"),
            HeaderValue::Text(s) => write!(f, "{s}"),
        }
    }
}

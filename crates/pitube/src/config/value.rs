//! Manifest scalar values.

use serde::Deserialize;
use std::fmt;

/// A scalar option value, kept exactly as the manifest spelled it.
///
/// `quality: 1` and `quality: "1"` are both accepted; no coercion happens
/// between the variants and the value is rendered verbatim on the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// An empty string counts as "not set" for inheritance purposes.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Treat `Some("")` the same as `None`.
pub(crate) fn non_empty(value: Option<&Scalar>) -> Option<&Scalar> {
    value.filter(|v| !v.is_empty())
}

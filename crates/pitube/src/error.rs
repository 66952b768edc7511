//! Engine-wide error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Engine-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("manifest fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("manifest parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream `{stream}` failed: {reason}")]
    Dispatch { stream: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Build a fetch error from a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: StatusCode) -> Self {
        let reason = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };
        Self::fetch(url, reason)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn dispatch(stream: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Dispatch {
            stream: stream.into(),
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error happened before any stream could be dispatched.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Network { .. } | Self::Parse(_)
        )
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

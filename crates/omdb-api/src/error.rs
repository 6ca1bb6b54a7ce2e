//! `OmdbError` - uniform failure value for every network-backed operation.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Result alias returned by `OmdbClient` operations.
pub type OmdbResult<T> = Result<T, OmdbError>;

/// Failure category.
///
/// Serializes to the lowercase names the OMDb wrapper has always reported
/// under `ErrorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Caller input was insufficient to form a request. No I/O happened.
    Validation,
    /// The exchange could not complete, or returned a non-200 status.
    Transport,
    /// HTTP 200 with an unparsable body, or the service reported failure.
    Server,
}

impl ErrorKind {
    /// Returns the wire name (`validation`, `transport`, `server`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by `OmdbClient` operations.
///
/// Serializes as `{"ErrorType": .., "message": .., "extra": ..}`, with
/// `extra` omitted when there is no diagnostic payload.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct OmdbError {
    /// Failure category.
    #[serde(rename = "ErrorType")]
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Diagnostic payload (status code, parser error, or full service payload).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl OmdbError {
    /// Creates an error without a diagnostic payload.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            extra: None,
        }
    }

    /// Attaches a diagnostic payload.
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<Value>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Creates a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a `Transport` error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates a `Server` error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }
}

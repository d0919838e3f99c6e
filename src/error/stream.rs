//! Streaming-related error types.
//!
//! Errors raised while opening the upstream stream. Terminations of an
//! already-open stream are not errors; see `session::TerminationReason`.

use std::fmt;

use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Upstream answered 429 (too many connections).
    RateLimited,

    /// Upstream answered with a status other than 200/201/429.
    Rejected { status: u16, message: String },

    /// The request failed before any status arrived.
    ConnectionFailed { url: String, source: HttpError },
}

impl StreamError {
    /// Check if the supervisor should start another session after this error.
    pub fn should_reconnect(&self) -> bool {
        matches!(self, StreamError::ConnectionFailed { .. })
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::RateLimited => "E_STREAM_RATE_LIMITED",
            StreamError::Rejected { .. } => "E_STREAM_REJECTED",
            StreamError::ConnectionFailed { .. } => "E_STREAM_CONN",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::RateLimited => write!(f, "TooManyConnections"),
            StreamError::Rejected { status, message } => {
                if message.is_empty() {
                    write!(f, "Could not stream tweets (HTTP {})", status)
                } else {
                    write!(f, "Could not stream tweets (HTTP {}): {}", status, message)
                }
            }
            StreamError::ConnectionFailed { url, source } => {
                write!(f, "Could not connect to {}: {}", url, source)
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::ConnectionFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

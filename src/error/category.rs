//! Error category classification.
//!
//! Categories decide what the relay does with a failure: fatal categories
//! stop the process, the rest are recovered where they occur.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing token or invalid settings.
    /// Fatal; nothing changes until the operator fixes the environment.
    Configuration,

    /// The upstream refused the stream (429 or any non-2xx status).
    /// Fatal at the session level.
    Protocol,

    /// A chunk could not be decoded.
    /// Recovered locally by discarding the chunk.
    Parse,

    /// The downstream signal call failed.
    /// Recovered locally by dropping the event.
    Forward,

    /// Close, error or timeout on the connection.
    /// Recovered by the supervisor through reconnection.
    Transport,
}

impl ErrorCategory {
    /// Returns true if errors in this category must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorCategory::Configuration | ErrorCategory::Protocol)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Forward => "forward",
            ErrorCategory::Transport => "transport",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => {
                "Check the environment variables (or .env file) and restart"
            }
            ErrorCategory::Protocol => {
                "The stream endpoint rejected the connection; check the token and connection limits"
            }
            ErrorCategory::Parse => "The chunk was skipped; the stream continues",
            ErrorCategory::Forward => "The event was dropped; check the signal endpoint",
            ErrorCategory::Transport => "The stream will reconnect automatically",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_categories() {
        assert!(ErrorCategory::Configuration.is_fatal());
        assert!(ErrorCategory::Protocol.is_fatal());
        assert!(!ErrorCategory::Parse.is_fatal());
        assert!(!ErrorCategory::Forward.is_fatal());
        assert!(!ErrorCategory::Transport.is_fatal());
    }

    #[test]
    fn test_display_matches_as_str() {
        for category in [
            ErrorCategory::Configuration,
            ErrorCategory::Protocol,
            ErrorCategory::Parse,
            ErrorCategory::Forward,
            ErrorCategory::Transport,
        ] {
            assert_eq!(category.to_string(), category.as_str());
            assert!(!category.recovery_hint().is_empty());
        }
    }
}

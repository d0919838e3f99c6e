//! Unified error type for the relay.

use std::fmt;

use super::category::ErrorCategory;
use super::stream::StreamError;
use crate::config::ConfigError;
use crate::traits::CredentialsError;

/// Unified error type for the relay.
///
/// Only errors that can leave a stream session are represented here; parse
/// and forward failures are absorbed where they happen.
#[derive(Debug)]
pub enum RelayError {
    /// Invalid or missing configuration.
    Config(ConfigError),

    /// No usable bearer token.
    Credentials(CredentialsError),

    /// The upstream stream could not be opened.
    Stream(StreamError),
}

impl RelayError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::Config(_) | RelayError::Credentials(_) => ErrorCategory::Configuration,
            RelayError::Stream(err) => {
                if err.should_reconnect() {
                    ErrorCategory::Transport
                } else {
                    ErrorCategory::Protocol
                }
            }
        }
    }

    /// Check if this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "E_CONFIG",
            RelayError::Credentials(_) => "E_CREDENTIALS",
            RelayError::Stream(err) => err.error_code(),
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(err) => write!(f, "{}", err),
            RelayError::Credentials(err) => write!(f, "{}", err),
            RelayError::Stream(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Config(err) => Some(err),
            RelayError::Credentials(err) => Some(err),
            RelayError::Stream(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RelayError {
    fn from(err: ConfigError) -> Self {
        RelayError::Config(err)
    }
}

impl From<CredentialsError> for RelayError {
    fn from(err: CredentialsError) -> Self {
        RelayError::Credentials(err)
    }
}

impl From<StreamError> for RelayError {
    fn from(err: StreamError) -> Self {
        RelayError::Stream(err)
    }
}

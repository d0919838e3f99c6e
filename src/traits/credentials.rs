//! Credentials provider trait abstraction.
//!
//! The stream session asks a [`TokenProvider`] for a fresh bearer token every
//! time it connects, so a rotated credential is picked up on reconnect.

use async_trait::async_trait;

use crate::models::AuthToken;

/// Credentials operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsError {
    /// No token is configured at the named source
    NotFound { source: String },
    /// A token source exists but holds an empty value
    Empty { source: String },
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::NotFound { source } => write!(f, "{} is missing", source),
            CredentialsError::Empty { source } => write!(f, "{} is empty", source),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Supplies the bearer token for the upstream stream.
///
/// # Example
///
/// ```ignore
/// use signal_relay::traits::TokenProvider;
///
/// async fn header<P: TokenProvider>(provider: &P) -> Result<String, CredentialsError> {
///     Ok(provider.bearer_token().await?.bearer_header())
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Fetch the current token.
    ///
    /// # Returns
    /// - `Ok(token)` when a non-empty token is available
    /// - `Err(error)` when no usable token exists; callers treat this as fatal
    async fn bearer_token(&self) -> Result<AuthToken, CredentialsError>;
}

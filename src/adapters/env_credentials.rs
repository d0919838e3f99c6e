//! Environment-backed token provider.
//!
//! Reads the bearer token from a process environment variable on every call,
//! so a value changed between connections is picked up on the next attempt.

use async_trait::async_trait;

use crate::config::TOKEN_VAR;
use crate::models::AuthToken;
use crate::traits::{CredentialsError, TokenProvider};

/// Token provider that reads an environment variable.
///
/// # Example
///
/// ```ignore
/// use signal_relay::adapters::EnvTokenProvider;
/// use signal_relay::traits::TokenProvider;
///
/// let provider = EnvTokenProvider::new();
/// let token = provider.bearer_token().await?;
/// ```
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Read from `TWITTER_BEARER_TOKEN`.
    pub fn new() -> Self {
        Self::with_var(TOKEN_VAR)
    }

    /// Read from a custom variable.
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn bearer_token(&self) -> Result<AuthToken, CredentialsError> {
        match std::env::var(&self.var) {
            Ok(value) if value.trim().is_empty() => Err(CredentialsError::Empty {
                source: self.var.clone(),
            }),
            Ok(value) => Ok(AuthToken::new(value.trim())),
            Err(std::env::VarError::NotPresent) => Err(CredentialsError::NotFound {
                source: self.var.clone(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(CredentialsError::Other(format!(
                "{} is not valid unicode",
                self.var
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TEST_VAR: &str = "SIGNAL_RELAY_TEST_TOKEN";

    #[test]
    fn test_default_reads_bearer_token_var() {
        assert_eq!(EnvTokenProvider::default().var(), "TWITTER_BEARER_TOKEN");
    }

    #[tokio::test]
    #[serial]
    async fn test_reads_token_each_call() {
        let provider = EnvTokenProvider::with_var(TEST_VAR);

        std::env::set_var(TEST_VAR, "first");
        assert_eq!(provider.bearer_token().await.unwrap().as_str(), "first");

        std::env::set_var(TEST_VAR, "second\n");
        assert_eq!(provider.bearer_token().await.unwrap().as_str(), "second");

        std::env::remove_var(TEST_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_var_is_not_found() {
        std::env::remove_var(TEST_VAR);
        let provider = EnvTokenProvider::with_var(TEST_VAR);

        let err = provider.bearer_token().await.unwrap_err();
        assert_eq!(
            err,
            CredentialsError::NotFound {
                source: TEST_VAR.to_string()
            }
        );
        assert_eq!(err.to_string(), "SIGNAL_RELAY_TEST_TOKEN is missing");
    }

    #[tokio::test]
    #[serial]
    async fn test_blank_var_is_empty() {
        std::env::set_var(TEST_VAR, "   ");
        let provider = EnvTokenProvider::with_var(TEST_VAR);

        assert!(matches!(
            provider.bearer_token().await,
            Err(CredentialsError::Empty { .. })
        ));

        std::env::remove_var(TEST_VAR);
    }
}

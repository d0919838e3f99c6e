//! Static token provider for testing.
//!
//! Hands out a token held in memory, so tests never touch the process
//! environment.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::AuthToken;
use crate::traits::{CredentialsError, TokenProvider};

const SOURCE: &str = "static token";

/// In-memory token provider for testing.
///
/// Clones share state, so a test can keep one handle while the session under
/// test owns another.
///
/// # Example
///
/// ```ignore
/// use signal_relay::adapters::mock::StaticTokenProvider;
/// use signal_relay::traits::TokenProvider;
///
/// let provider = StaticTokenProvider::new("test-token");
/// assert_eq!(provider.bearer_token().await?.as_str(), "test-token");
///
/// // Rotate the credential between connections
/// provider.set_token(Some("rotated"));
///
/// // Remove it entirely
/// provider.set_token(None);
/// assert!(provider.bearer_token().await.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
}

impl StaticTokenProvider {
    /// Create a provider holding the given token.
    pub fn new(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a provider with no token configured.
    pub fn empty() -> Self {
        Self {
            token: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the token. `None` makes every fetch fail.
    pub fn set_token(&self, token: Option<&str>) {
        *self.token.lock().unwrap() = token.map(str::to_string);
    }

    /// Number of times a token has been requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticTokenProvider {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<AuthToken, CredentialsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.token.lock().unwrap().as_deref() {
            None => Err(CredentialsError::NotFound {
                source: SOURCE.to_string(),
            }),
            Some("") => Err(CredentialsError::Empty {
                source: SOURCE.to_string(),
            }),
            Some(token) => Ok(AuthToken::new(token)),
        }
    }
}

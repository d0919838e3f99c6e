//! Error handling for the relay.
//!
//! # Error Categories
//!
//! | Category | Example | Handling |
//! |----------|---------|----------|
//! | Configuration | missing bearer token | fatal |
//! | Protocol | 429, non-2xx status | fatal |
//! | Parse | malformed chunk | chunk skipped |
//! | Forward | signal POST failed | event dropped, outcome reported |
//! | Transport | close, error, idle timeout | supervisor reconnects |

mod category;
mod relay_error;
mod stream;

pub use category::ErrorCategory;
pub use relay_error::RelayError;
pub use stream::StreamError;

/// Type alias for Results using RelayError.
pub type RelayResult<T> = Result<T, RelayError>;

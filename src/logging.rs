//! Logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "signal_relay=info";

/// Build the filter from `RUST_LOG`, falling back to `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber: human-readable lines on stderr.
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(default_filter: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_falls_back_to_default() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter(DEFAULT_FILTER).to_string(), DEFAULT_FILTER);
    }

    #[test]
    #[serial]
    fn test_env_filter_prefers_rust_log() {
        std::env::set_var("RUST_LOG", "signal_relay=debug");
        assert_eq!(env_filter(DEFAULT_FILTER).to_string(), "signal_relay=debug");
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(DEFAULT_FILTER);
        init_tracing(DEFAULT_FILTER);
    }
}

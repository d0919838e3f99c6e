//! Relay configuration.
//!
//! Everything is read from the process environment (after `.env` has been
//! loaded by the binary). Use the builder methods to override values in
//! tests.
//!
//! # Example
//!
//! ```ignore
//! use signal_relay::config::RelayConfig;
//!
//! let config = RelayConfig::from_env()?
//!     .with_idle_timeout(std::time::Duration::from_secs(10));
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::adapters::{ExponentialBackoff, ImmediateReconnect};
use crate::error::RelayResult;
use crate::traits::ReconnectPolicy;

/// Filtered stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "https://api.twitter.com/2/tweets/search/stream";

/// Environment variable holding the upstream bearer token.
pub const TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";

/// Cloud functions region used when `FIREBASE_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-central1";

/// Twitter sends a keep-alive every 20 seconds; allow for one missed beat.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

/// Limit for one signal POST.
pub const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 10;

const ENV_MODE: &str = "RELAY_ENV";
const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
const ENV_REGION: &str = "FIREBASE_REGION";
const ENV_STREAM_URL: &str = "RELAY_STREAM_URL";
const ENV_NOTIFY_BASE_URL: &str = "RELAY_NOTIFY_BASE_URL";
const ENV_IDLE_TIMEOUT: &str = "RELAY_IDLE_TIMEOUT_SECS";
const ENV_FORWARD_TIMEOUT: &str = "RELAY_FORWARD_TIMEOUT_SECS";
const ENV_RECONNECT: &str = "RELAY_RECONNECT";
const ENV_BACKOFF_BASE_MS: &str = "RELAY_BACKOFF_BASE_MS";
const ENV_BACKOFF_MAX_SECS: &str = "RELAY_BACKOFF_MAX_SECS";

/// Configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is missing")]
    MissingVar(&'static str),

    /// A variable is set to something unusable
    #[error("{var} has invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which signal endpoint template to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Deployed cloud functions
    Production,
    /// Local functions emulator
    Development,
}

impl DeploymentMode {
    /// `production` selects [`DeploymentMode::Production`]; anything else,
    /// including an unset variable, is development.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(value) if value.trim().eq_ignore_ascii_case("production") => {
                DeploymentMode::Production
            }
            _ => DeploymentMode::Development,
        }
    }
}

/// Resolved base URL of the downstream notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEndpoint {
    base_url: String,
}

impl NotificationEndpoint {
    /// Build the base URL for a deployment mode.
    pub fn resolve(mode: DeploymentMode, region: &str, project_id: &str) -> Self {
        let base_url = match mode {
            DeploymentMode::Production => {
                format!("https://{}-{}.cloudfunctions.net", region, project_id)
            }
            DeploymentMode::Development => {
                format!("http://localhost:5001/{}/{}", project_id, region)
            }
        };
        Self { base_url }
    }

    /// Use an explicit base URL. A trailing slash is dropped.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL the forwarder posts to.
    pub fn signal_url(&self) -> String {
        format!("{}/signal", self.base_url)
    }
}

/// How the supervisor paces reconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconnectStrategy {
    /// Reconnect with no delay, forever
    Immediate,
    /// Capped exponential backoff between unproductive sessions
    Exponential { base: Duration, max: Duration },
}

impl ReconnectStrategy {
    pub fn into_policy(self) -> Arc<dyn ReconnectPolicy> {
        match self {
            ReconnectStrategy::Immediate => Arc::new(ImmediateReconnect),
            ReconnectStrategy::Exponential { base, max } => {
                Arc::new(ExponentialBackoff::new(base, max))
            }
        }
    }
}

/// Complete relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream streaming endpoint
    pub stream_url: String,
    /// Downstream signal endpoint
    pub endpoint: NotificationEndpoint,
    /// Deployment mode the endpoint was resolved for
    pub mode: DeploymentMode,
    /// Maximum silence on the stream before the session is ended, also
    /// applied to the wait for response headers
    pub idle_timeout: Duration,
    /// Limit for one downstream signal POST
    pub forward_timeout: Duration,
    /// Reconnect pacing
    pub reconnect: ReconnectStrategy,
}

impl RelayConfig {
    /// Create a config with an explicit endpoint and default everything else.
    pub fn new(endpoint: NotificationEndpoint) -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            endpoint,
            mode: DeploymentMode::Development,
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            forward_timeout: Duration::from_secs(DEFAULT_FORWARD_TIMEOUT_SECS),
            reconnect: ReconnectStrategy::Immediate,
        }
    }

    /// Set the upstream streaming endpoint.
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the signal POST timeout.
    pub fn with_forward_timeout(mut self, timeout: Duration) -> Self {
        self.forward_timeout = timeout;
        self
    }

    /// Set the reconnect strategy.
    pub fn with_reconnect(mut self, reconnect: ReconnectStrategy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`RelayConfig::from_env`] as a [`RelayError`](crate::error::RelayError),
    /// so startup failures carry an error code and recovery hint.
    pub fn load() -> RelayResult<Self> {
        Ok(Self::from_env()?)
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mode = DeploymentMode::from_flag(get(ENV_MODE).as_deref());

        let endpoint = match get(ENV_NOTIFY_BASE_URL) {
            Some(base) => NotificationEndpoint::with_base_url(base),
            None => {
                let project_id = get(ENV_PROJECT_ID).ok_or(ConfigError::MissingVar(ENV_PROJECT_ID))?;
                let region = get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());
                NotificationEndpoint::resolve(mode, &region, &project_id)
            }
        };

        let stream_url = get(ENV_STREAM_URL).unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());

        let idle_timeout = match get(ENV_IDLE_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_positive(ENV_IDLE_TIMEOUT, &raw)?),
            None => Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        };

        let forward_timeout = match get(ENV_FORWARD_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_positive(ENV_FORWARD_TIMEOUT, &raw)?),
            None => Duration::from_secs(DEFAULT_FORWARD_TIMEOUT_SECS),
        };

        let reconnect = match get(ENV_RECONNECT).as_deref().map(str::trim) {
            None | Some("immediate") => ReconnectStrategy::Immediate,
            Some("exponential") => {
                let base_ms = match get(ENV_BACKOFF_BASE_MS) {
                    Some(raw) => parse_positive(ENV_BACKOFF_BASE_MS, &raw)?,
                    None => 1000,
                };
                let max_secs = match get(ENV_BACKOFF_MAX_SECS) {
                    Some(raw) => parse_positive(ENV_BACKOFF_MAX_SECS, &raw)?,
                    None => 30,
                };
                ReconnectStrategy::Exponential {
                    base: Duration::from_millis(base_ms),
                    max: Duration::from_secs(max_secs),
                }
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: ENV_RECONNECT,
                    value: other.to_string(),
                    reason: "expected \"immediate\" or \"exponential\"".to_string(),
                })
            }
        };

        Ok(Self {
            stream_url,
            endpoint,
            mode,
            idle_timeout,
            forward_timeout,
            reconnect,
        })
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

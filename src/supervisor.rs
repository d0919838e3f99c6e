//! Reconnection supervisor.
//!
//! Runs stream sessions back to back for the lifetime of the process. Any
//! transport termination (close, error, idle timeout, failed connect) starts
//! a new session after the delay chosen by the [`ReconnectPolicy`]. Startup
//! failures that reconnecting cannot fix end the loop.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::forwarder::Forwarder;
use crate::session::{StreamSession, Termination, TerminationReason};
use crate::traits::{ForwardObserver, HttpClient, ReconnectPolicy, TokenProvider};

/// Supervisor lifecycle, published on a watch channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorState {
    /// Opening session number `attempt`
    Connecting { attempt: u64 },
    /// The stream was accepted and is being consumed
    Connected { session_id: Uuid, attempt: u64 },
    /// The session ended; the next one starts after `retry_in`
    Terminated {
        attempt: u64,
        reason: TerminationReason,
        retry_in: Duration,
    },
    /// A fatal error stopped the loop
    Failed { error_code: &'static str },
}

impl SupervisorState {
    pub fn is_failed(&self) -> bool {
        matches!(self, SupervisorState::Failed { .. })
    }
}

/// Keeps the relay connected.
pub struct Supervisor {
    config: RelayConfig,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenProvider>,
    forwarder: Forwarder,
    policy: Arc<dyn ReconnectPolicy>,
    state_tx: watch::Sender<SupervisorState>,
}

impl Supervisor {
    /// Build a supervisor. The reconnect policy comes from the config.
    pub fn new(
        config: RelayConfig,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenProvider>,
        observer: Arc<dyn ForwardObserver>,
    ) -> Self {
        let forwarder = Forwarder::new(Arc::clone(&http), &config.endpoint, observer);
        let policy = config.reconnect.clone().into_policy();
        let (state_tx, _) = watch::channel(SupervisorState::Connecting { attempt: 1 });

        Self {
            config,
            http,
            tokens,
            forwarder,
            policy,
            state_tx,
        }
    }

    /// Replace the reconnect policy.
    pub fn with_policy(mut self, policy: Arc<dyn ReconnectPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Subscribe to state changes.
    pub fn state_receiver(&self) -> watch::Receiver<SupervisorState> {
        self.state_tx.subscribe()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Run sessions until a fatal error occurs.
    ///
    /// Never returns `Ok`: the relay is meant to run forever.
    pub async fn run(self) -> RelayResult<Infallible> {
        info!(
            stream_url = %self.config.stream_url,
            signal_url = %self.forwarder.signal_url(),
            policy = self.policy.name(),
            "Starting relay"
        );

        let mut attempt: u64 = 1;
        let mut consecutive_failures: u32 = 0;

        loop {
            self.set_state(SupervisorState::Connecting { attempt });

            let termination = match self.run_session(attempt).await {
                Ok(termination) => termination,
                Err(err) => {
                    error!(
                        code = err.error_code(),
                        category = %err.category(),
                        hint = err.recovery_hint(),
                        "Relay stopped: {}",
                        err
                    );
                    self.set_state(SupervisorState::Failed {
                        error_code: err.error_code(),
                    });
                    return Err(err);
                }
            };

            if termination.was_productive() {
                consecutive_failures = 0;
            } else {
                consecutive_failures = consecutive_failures.saturating_add(1);
            }

            let retry_in = self.policy.delay(consecutive_failures);
            info!(
                session_id = %termination.session_id,
                reason = termination.reason.as_str(),
                chunks = termination.chunks_received,
                events = termination.events_parsed,
                uptime_secs = (Utc::now() - termination.started_at).num_seconds(),
                consecutive_failures,
                "Session ended ({}), reconnecting in {}ms",
                termination.reason,
                retry_in.as_millis()
            );
            self.set_state(SupervisorState::Terminated {
                attempt,
                reason: termination.reason,
                retry_in,
            });

            if retry_in.is_zero() {
                // Let spawned forwards run before the next connect.
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(retry_in).await;
            }

            attempt += 1;
        }
    }

    /// Open one session and consume it.
    ///
    /// A connect-time transport failure is folded into a termination; every
    /// other startup error is returned as fatal.
    async fn run_session(&self, attempt: u64) -> RelayResult<Termination> {
        let session = StreamSession::new(
            &self.config,
            Arc::clone(&self.http),
            Arc::clone(&self.tokens),
            self.forwarder.clone(),
        );

        match session.connect().await {
            Ok(active) => {
                self.set_state(SupervisorState::Connected {
                    session_id: active.session_id(),
                    attempt,
                });
                Ok(active.run().await)
            }
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(session_id = %session.id(), "Could not open tweet stream: {}", err);
                Ok(Termination {
                    session_id: session.id(),
                    started_at: Utc::now(),
                    reason: TerminationReason::ConnectFailed(err.to_string()),
                    chunks_received: 0,
                    events_parsed: 0,
                })
            }
        }
    }

    fn set_state(&self, state: SupervisorState) {
        self.state_tx.send_replace(state);
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("policy", &self.policy.name())
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

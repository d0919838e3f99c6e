//! One connection attempt against the upstream stream.
//!
//! A [`StreamSession`] fetches a token, opens the stream and classifies the
//! status. On acceptance it hands back an [`ActiveStream`], which consumes
//! the body until the connection closes, errors or goes idle.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::{RelayResult, StreamError};
use crate::forwarder::Forwarder;
use crate::parser::parse_chunk;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, TokenProvider};

/// Bytes of a rejected response body kept for the error message.
const REJECTION_BODY_LIMIT: usize = 512;

/// Classification of the initial stream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// 200 or 201
    Accepted,
    /// 429
    RateLimited,
    /// Anything else
    OtherFailure(u16),
}

impl ConnectionOutcome {
    pub fn classify(status: u16) -> Self {
        match status {
            200 | 201 => ConnectionOutcome::Accepted,
            429 => ConnectionOutcome::RateLimited,
            other => ConnectionOutcome::OtherFailure(other),
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// Upstream closed the body
    Closed,
    /// The body stream yielded an error
    TransportError(String),
    /// No chunk arrived within the idle timeout
    IdleTimeout(Duration),
    /// The request failed before a status arrived
    ConnectFailed(String),
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Closed => "closed",
            TerminationReason::TransportError(_) => "error",
            TerminationReason::IdleTimeout(_) => "timeout",
            TerminationReason::ConnectFailed(_) => "connect_failed",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Closed => write!(f, "connection closed"),
            TerminationReason::TransportError(msg) => write!(f, "stream error: {}", msg),
            TerminationReason::IdleTimeout(after) => {
                write!(f, "no data for {}ms", after.as_millis())
            }
            TerminationReason::ConnectFailed(msg) => write!(f, "connect failed: {}", msg),
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone)]
pub struct Termination {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub reason: TerminationReason,
    /// Chunks read from the body, keep-alives included
    pub chunks_received: u64,
    /// Chunks that decoded to an event
    pub events_parsed: u64,
}

impl Termination {
    /// A session that saw at least one chunk proves the upstream is reachable.
    pub fn was_productive(&self) -> bool {
        self.chunks_received > 0
    }
}

/// A single connection attempt.
pub struct StreamSession {
    id: Uuid,
    stream_url: String,
    idle_timeout: Duration,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenProvider>,
    forwarder: Forwarder,
}

impl StreamSession {
    pub fn new(
        config: &RelayConfig,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenProvider>,
        forwarder: Forwarder,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream_url: config.stream_url.clone(),
            idle_timeout: config.idle_timeout,
            http,
            tokens,
            forwarder,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Connect and consume the stream until it terminates.
    ///
    /// Errors are startup failures only; an accepted stream always ends with
    /// a [`Termination`].
    pub async fn open(&self) -> RelayResult<Termination> {
        let active = self.connect().await?;
        Ok(active.run().await)
    }

    /// Fetch a token, issue the stream request and classify the status.
    pub async fn connect(&self) -> RelayResult<ActiveStream> {
        let span = tracing::info_span!("session", id = %self.id);
        self.connect_inner().instrument(span).await
    }

    async fn connect_inner(&self) -> RelayResult<ActiveStream> {
        let token = self.tokens.bearer_token().await?;

        info!("Connecting to tweet stream at {}", self.stream_url);

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), token.bearer_header());

        // Headers must arrive within the idle timeout too, or a silent
        // upstream would hold the session open forever.
        let request = self.http.get_stream(&self.stream_url, &headers);
        let response = match tokio::time::timeout(self.idle_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(HttpError::Timeout(format!(
                "no response headers within {}ms",
                self.idle_timeout.as_millis()
            ))),
        }
        .map_err(|source| StreamError::ConnectionFailed {
            url: self.stream_url.clone(),
            source,
        })?;

        match ConnectionOutcome::classify(response.status) {
            ConnectionOutcome::Accepted => {
                debug!(status = response.status, "Stream accepted");
                Ok(ActiveStream {
                    session_id: self.id,
                    started_at: Utc::now(),
                    body: response.body,
                    idle_timeout: self.idle_timeout,
                    forwarder: self.forwarder.clone(),
                    chunks_received: 0,
                    events_parsed: 0,
                })
            }
            ConnectionOutcome::RateLimited => Err(StreamError::RateLimited.into()),
            ConnectionOutcome::OtherFailure(status) => {
                let message = response.text_prefix(REJECTION_BODY_LIMIT).await;
                Err(StreamError::Rejected { status, message }.into())
            }
        }
    }
}

/// An accepted stream whose body is being consumed.
pub struct ActiveStream {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    body: ByteStream,
    idle_timeout: Duration,
    forwarder: Forwarder,
    chunks_received: u64,
    events_parsed: u64,
}

impl ActiveStream {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Read chunks until the stream closes, errors or stays silent for the
    /// idle timeout.
    ///
    /// Chunks are parsed in arrival order. Each event is forwarded on its own
    /// task, so forwards may complete out of order.
    pub async fn run(self) -> Termination {
        let span = tracing::info_span!("session", id = %self.session_id);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(mut self) -> Termination {
        let reason = loop {
            match tokio::time::timeout(self.idle_timeout, self.body.next()).await {
                Ok(Some(Ok(chunk))) => self.handle_chunk(chunk),
                Ok(Some(Err(e))) => {
                    warn!("Error on tweet stream: {}", e);
                    break TerminationReason::TransportError(e.to_string());
                }
                Ok(None) => {
                    info!("Connection to tweet stream closed");
                    break TerminationReason::Closed;
                }
                Err(_) => {
                    warn!(
                        "Timeout on tweet stream after {}ms of silence",
                        self.idle_timeout.as_millis()
                    );
                    break TerminationReason::IdleTimeout(self.idle_timeout);
                }
            }
        };

        Termination {
            session_id: self.session_id,
            started_at: self.started_at,
            reason,
            chunks_received: self.chunks_received,
            events_parsed: self.events_parsed,
        }
    }

    fn handle_chunk(&mut self, chunk: Bytes) {
        self.chunks_received += 1;

        let Some(event) = parse_chunk(&chunk) else {
            return;
        };
        self.events_parsed += 1;

        info!(
            tweet_id = %event.data.id,
            author_id = %event.data.author_id,
            rules = ?event.rule_ids().collect::<Vec<_>>(),
            "Received tweet"
        );

        let forwarder = self.forwarder.clone();
        tokio::spawn(
            async move {
                forwarder.forward(event).await;
            }
            .instrument(tracing::Span::current()),
        );
    }
}

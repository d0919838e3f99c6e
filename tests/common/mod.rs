//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use signal_relay::adapters::mock::{RecordingObserver, StaticTokenProvider};
use signal_relay::adapters::ReqwestHttpClient;
use signal_relay::config::{NotificationEndpoint, RelayConfig};
use signal_relay::forwarder::Forwarder;
use signal_relay::session::StreamSession;
use wiremock::MockServer;

pub const STREAM_PATH: &str = "/2/tweets/search/stream";
pub const SIGNAL_PATH: &str = "/signal";
pub const TOKEN: &str = "integration-token";

/// One stream record as the upstream sends it.
pub fn record_json() -> serde_json::Value {
    serde_json::json!({
        "data": { "id": "1456", "author_id": "42", "text": "hello relay" },
        "matching_rules": [{ "id": "rule-1", "tag": "greetings" }]
    })
}

pub fn record_body() -> String {
    format!("{}\r\n", record_json())
}

/// Config pointing both the stream and the signal endpoint at `server`.
pub fn relay_config(server: &MockServer) -> RelayConfig {
    RelayConfig::new(NotificationEndpoint::with_base_url(server.uri()))
        .with_stream_url(format!("{}{}", server.uri(), STREAM_PATH))
        .with_idle_timeout(Duration::from_secs(2))
}

/// A session wired to real HTTP against `server`.
pub fn session(
    config: &RelayConfig,
    tokens: &StaticTokenProvider,
    observer: &RecordingObserver,
) -> StreamSession {
    session_with_client(config, ReqwestHttpClient::new(), tokens, observer)
}

/// Like [`session`], with a caller-configured HTTP client.
pub fn session_with_client(
    config: &RelayConfig,
    client: ReqwestHttpClient,
    tokens: &StaticTokenProvider,
    observer: &RecordingObserver,
) -> StreamSession {
    let http = Arc::new(client);
    let forwarder = Forwarder::new(http.clone(), &config.endpoint, Arc::new(observer.clone()));
    StreamSession::new(config, http, Arc::new(tokens.clone()), forwarder)
}

/// Requests `server` received for the given method and path.
pub async fn received(server: &MockServer, method: &str, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == method && request.url.path() == path)
        .collect()
}

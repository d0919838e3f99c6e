//! Reconnection tests against a real HTTP server using wiremock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{received, record_body, relay_config, SIGNAL_PATH, STREAM_PATH, TOKEN};
use serial_test::serial;
use signal_relay::adapters::mock::{RecordingObserver, StaticTokenProvider};
use signal_relay::adapters::{EnvTokenProvider, ReqwestHttpClient};
use signal_relay::config::TOKEN_VAR;
use signal_relay::error::{RelayError, StreamError};
use signal_relay::supervisor::{Supervisor, SupervisorState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stream succeeds `sessions` times, then answers 429 so the loop stops.
async fn mount_stream(server: &MockServer, sessions: u64, body: String) {
    Mock::given(method("GET"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .up_to_n_times(sessions)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(server)
        .await;
}

async fn mount_signal(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SIGNAL_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reconnects_after_stream_closes() {
    let server = MockServer::start().await;
    mount_stream(&server, 1, "\r\n".to_string()).await;
    mount_signal(&server).await;

    let tokens = StaticTokenProvider::new(TOKEN);
    let supervisor = Supervisor::new(
        relay_config(&server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(tokens.clone()),
        Arc::new(RecordingObserver::new()),
    );
    let state = supervisor.state_receiver();

    let err = supervisor.run().await.unwrap_err();

    assert!(matches!(err, RelayError::Stream(StreamError::RateLimited)));
    assert_eq!(received(&server, "GET", STREAM_PATH).await.len(), 2);
    assert_eq!(tokens.calls(), 2);
    assert_eq!(
        *state.borrow(),
        SupervisorState::Failed {
            error_code: "E_STREAM_RATE_LIMITED"
        }
    );
}

#[tokio::test]
async fn test_records_from_every_session_are_forwarded() {
    let server = MockServer::start().await;
    mount_stream(&server, 3, record_body()).await;
    mount_signal(&server).await;

    let observer = RecordingObserver::new();
    let supervisor = Supervisor::new(
        relay_config(&server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(StaticTokenProvider::new(TOKEN)),
        Arc::new(observer.clone()),
    );

    supervisor.run().await.unwrap_err();

    assert!(observer.wait_for(3, Duration::from_secs(5)).await);
    assert_eq!(received(&server, "GET", STREAM_PATH).await.len(), 4);
    assert_eq!(received(&server, "POST", SIGNAL_PATH).await.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_token_is_read_from_environment_on_each_connect() {
    let server = MockServer::start().await;
    mount_stream(&server, 1, "\r\n".to_string()).await;

    std::env::set_var(TOKEN_VAR, "env-token");
    let supervisor = Supervisor::new(
        relay_config(&server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(EnvTokenProvider::new()),
        Arc::new(RecordingObserver::new()),
    );
    supervisor.run().await.unwrap_err();
    std::env::remove_var(TOKEN_VAR);

    let requests = received(&server, "GET", STREAM_PATH).await;
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(
            request
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok()),
            Some("Bearer env-token")
        );
    }
}

#[tokio::test]
#[serial]
async fn test_missing_environment_token_is_fatal() {
    let server = MockServer::start().await;
    mount_stream(&server, 1, "\r\n".to_string()).await;

    std::env::remove_var(TOKEN_VAR);
    let supervisor = Supervisor::new(
        relay_config(&server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(EnvTokenProvider::new()),
        Arc::new(RecordingObserver::new()),
    );

    let err = supervisor.run().await.unwrap_err();
    assert!(matches!(err, RelayError::Credentials(_)));
    assert_eq!(err.to_string(), "TWITTER_BEARER_TOKEN is missing");
    assert!(received(&server, "GET", STREAM_PATH).await.is_empty());
}

#[tokio::test]
async fn test_reconnects_when_headers_never_arrive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let supervisor = Supervisor::new(
        relay_config(&server).with_idle_timeout(Duration::from_millis(200)),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(StaticTokenProvider::new(TOKEN)),
        Arc::new(RecordingObserver::new()),
    );

    let err = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("a stalled connect must lead to a new session")
        .unwrap_err();

    assert!(matches!(err, RelayError::Stream(StreamError::RateLimited)));
    assert_eq!(received(&server, "GET", STREAM_PATH).await.len(), 2);
}

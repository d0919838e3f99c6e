//! Forwards parsed events to the downstream signal endpoint.
//!
//! Forwarding is fire-and-forget: one POST per event, no retry. Whatever
//! happens is reported to a [`ForwardObserver`] and never propagated.

use std::sync::Arc;

use crate::config::NotificationEndpoint;
use crate::error::ErrorCategory;
use crate::models::{NotificationPayload, StreamEvent};
use crate::traits::{ForwardObserver, Headers, HttpClient};

/// What happened to one forwarded event.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    /// The endpoint answered 2xx
    Delivered { status: u16 },
    /// The endpoint answered with a non-2xx status
    Rejected { status: u16, body: String },
    /// The request never produced a response
    Failed { message: String },
}

impl ForwardOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ForwardOutcome::Delivered { .. })
    }

    /// Anything but a delivery is a forward failure.
    pub fn error_category(&self) -> Option<ErrorCategory> {
        if self.is_delivered() {
            None
        } else {
            Some(ErrorCategory::Forward)
        }
    }
}

/// Posts events to `<base>/signal`.
#[derive(Clone)]
pub struct Forwarder {
    http: Arc<dyn HttpClient>,
    signal_url: String,
    observer: Arc<dyn ForwardObserver>,
}

impl Forwarder {
    pub fn new(
        http: Arc<dyn HttpClient>,
        endpoint: &NotificationEndpoint,
        observer: Arc<dyn ForwardObserver>,
    ) -> Self {
        Self {
            http,
            signal_url: endpoint.signal_url(),
            observer,
        }
    }

    pub fn signal_url(&self) -> &str {
        &self.signal_url
    }

    /// Deliver one event. Never fails; the outcome is returned and also
    /// handed to the observer.
    pub async fn forward(&self, event: StreamEvent) -> ForwardOutcome {
        let payload = NotificationPayload::new(event);
        let outcome = self.post(&payload).await;
        self.observer.record(&payload.data, &outcome);
        outcome
    }

    async fn post(&self, payload: &NotificationPayload) -> ForwardOutcome {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                return ForwardOutcome::Failed {
                    message: format!("Failed to serialize payload: {}", e),
                }
            }
        };

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        match self.http.post(&self.signal_url, &body, &headers).await {
            Ok(response) if response.is_success() => ForwardOutcome::Delivered {
                status: response.status,
            },
            Ok(response) => ForwardOutcome::Rejected {
                status: response.status,
                body: response.text().unwrap_or_default(),
            },
            Err(e) => ForwardOutcome::Failed {
                message: e.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("signal_url", &self.signal_url)
            .finish_non_exhaustive()
    }
}

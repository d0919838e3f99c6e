//! Forward observer that writes outcomes to the log.

use tracing::{debug, warn};

use crate::forwarder::ForwardOutcome;
use crate::models::StreamEvent;
use crate::traits::ForwardObserver;

/// Logs every forward. Deliveries go to debug, everything else to warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ForwardObserver for TracingObserver {
    fn record(&self, event: &StreamEvent, outcome: &ForwardOutcome) {
        let category = outcome.error_category().map(|c| c.as_str());
        match outcome {
            ForwardOutcome::Delivered { status } => {
                debug!(tweet_id = %event.data.id, status, "Signal delivered");
            }
            ForwardOutcome::Rejected { status, body } => {
                warn!(
                    tweet_id = %event.data.id,
                    status,
                    category,
                    "Signal rejected: {}",
                    body
                );
            }
            ForwardOutcome::Failed { message } => {
                warn!(tweet_id = %event.data.id, category, "Signal failed: {}", message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventData;

    #[test]
    fn test_record_every_outcome_without_subscriber() {
        let observer = TracingObserver::new();
        let event = StreamEvent {
            data: EventData {
                id: "1".to_string(),
                author_id: "2".to_string(),
                text: "hi".to_string(),
            },
            matching_rules: Vec::new(),
        };

        observer.record(&event, &ForwardOutcome::Delivered { status: 200 });
        observer.record(
            &event,
            &ForwardOutcome::Rejected {
                status: 500,
                body: "boom".to_string(),
            },
        );
        observer.record(
            &event,
            &ForwardOutcome::Failed {
                message: "refused".to_string(),
            },
        );
    }
}

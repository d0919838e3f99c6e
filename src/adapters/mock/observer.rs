//! Recording forward observer for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use crate::forwarder::ForwardOutcome;
use crate::models::StreamEvent;
use crate::traits::ForwardObserver;

/// Keeps every forward it is told about.
///
/// Forwards run on detached tasks, so tests use [`wait_for`] to block until
/// the expected number of outcomes has arrived.
///
/// [`wait_for`]: RecordingObserver::wait_for
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    records: Arc<Mutex<Vec<(StreamEvent, ForwardOutcome)>>>,
    notify: Arc<Notify>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<ForwardOutcome> {
        let records = self.records.lock().unwrap();
        records.iter().map(|(_, outcome)| outcome.clone()).collect()
    }

    pub fn events(&self) -> Vec<StreamEvent> {
        let records = self.records.lock().unwrap();
        records.iter().map(|(event, _)| event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until at least `count` outcomes are recorded.
    ///
    /// Returns `false` if the timeout elapses first.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

impl ForwardObserver for RecordingObserver {
    fn record(&self, event: &StreamEvent, outcome: &ForwardOutcome) {
        self.records
            .lock()
            .unwrap()
            .push((event.clone(), outcome.clone()));
        self.notify.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventData;

    fn event(id: &str) -> StreamEvent {
        StreamEvent {
            data: EventData {
                id: id.to_string(),
                author_id: "a".to_string(),
                text: "t".to_string(),
            },
            matching_rules: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_wait_for_already_recorded() {
        let observer = RecordingObserver::new();
        observer.record(&event("1"), &ForwardOutcome::Delivered { status: 200 });
        assert!(observer.wait_for(1, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_wait_for_recorded_later() {
        let observer = RecordingObserver::new();
        let writer = observer.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            writer.record(&event("1"), &ForwardOutcome::Delivered { status: 200 });
        });

        assert!(observer.wait_for(1, Duration::from_secs(2)).await);
        assert_eq!(observer.events(), vec![event("1")]);
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let observer = RecordingObserver::new();
        assert!(!observer.wait_for(1, Duration::from_millis(20)).await);
        assert!(observer.is_empty());
    }
}

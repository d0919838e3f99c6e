//! Observability seam for forwarding results.

use crate::forwarder::ForwardOutcome;
use crate::models::StreamEvent;

/// Receives the outcome of every downstream forward.
///
/// Forward failures never reach the stream loop; they are reported here
/// instead, so a sink can log, count or alert on them.
pub trait ForwardObserver: Send + Sync {
    /// Called once per forward, after the POST completed or failed.
    fn record(&self, event: &StreamEvent, outcome: &ForwardOutcome);
}

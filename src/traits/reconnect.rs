//! Reconnect policy trait abstraction.

use std::time::Duration;

/// Decides how long the supervisor waits before starting the next session.
///
/// `consecutive_failures` counts sessions in a row that ended without
/// receiving a single chunk. It is 0 right after a productive session, so a
/// policy can reconnect at once when the upstream was healthy.
pub trait ReconnectPolicy: Send + Sync {
    fn delay(&self, consecutive_failures: u32) -> Duration;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

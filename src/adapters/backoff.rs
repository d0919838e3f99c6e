//! Reconnect delay policies.

use std::time::Duration;

use crate::traits::ReconnectPolicy;

/// Reconnect right away, every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateReconnect;

impl ReconnectPolicy for ImmediateReconnect {
    fn delay(&self, _consecutive_failures: u32) -> Duration {
        Duration::ZERO
    }

    fn name(&self) -> &'static str {
        "immediate"
    }
}

/// Doubling delay: `base * 2^(n-1)` for the n-th consecutive failure,
/// capped at `max`. No delay before the first attempt.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl ReconnectPolicy for ExponentialBackoff {
    fn delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(consecutive_failures - 1).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }

    fn name(&self) -> &'static str {
        "exponential"
    }
}

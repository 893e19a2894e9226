//! Fixed inter-request pacing for the BigCommerce API.
//!
//! The store API enforces a per-store request quota. Rather than reacting to
//! 429s, every caller waits a constant delay between consecutive calls. The
//! delay is a policy constant; it never grows or shrinks at runtime.

use std::time::Duration;

/// Inserts a fixed pause between consecutive remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPacer {
    delay: Duration,
}

impl RequestPacer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// A pacer that never sleeps.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay. Returns immediately when disabled.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

//! Fixed-window request pacing.
//!
//! Listing pages are requested one at a time with a random pause between
//! them. The window never adapts to server behaviour; it exists only to keep
//! the request rate below what the target treats as automated traffic.

use std::time::Duration;

use rand::Rng;

/// Sleeps a uniformly random duration in `[min_ms, max_ms]` between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    /// Builds a pacer for the inclusive window `[min_ms, max_ms]`.
    ///
    /// An inverted window is normalized by swapping its bounds.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// A pacer that never sleeps. Used by tests and by callers that throttle
    /// elsewhere.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    #[must_use]
    pub fn min_ms(&self) -> u64 {
        self.min_ms
    }

    #[must_use]
    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }

    /// Draws the next pause from the window.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleeps for [`Self::next_delay`].
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = delay.as_millis(), "pacing before next page");
        tokio::time::sleep(delay).await;
    }
}

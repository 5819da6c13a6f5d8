//! Request pacing for history loads.

use crate::defaults::PACING_INTERVAL;
use crate::runtime;
use std::time::Duration;

/// At most `max_concurrent` requests in flight, each new request after the
/// first batch delayed by `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    max_concurrent: usize,
    delay: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::sequential(PACING_INTERVAL)
    }
}

impl Throttle {
    /// One request at a time, `delay` between them.
    pub fn sequential(delay: Duration) -> Self {
        Self {
            max_concurrent: 1,
            delay,
        }
    }

    /// Up to `max_concurrent` requests at a time. Zero is treated as one.
    pub fn bounded(max_concurrent: usize, delay: Duration) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            delay,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the request at `position` (0-based) must wait before starting.
    pub fn must_wait(&self, position: usize) -> bool {
        position >= self.max_concurrent && !self.delay.is_zero()
    }

    pub async fn pause(&self) {
        runtime::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential_100ms() {
        let t = Throttle::default();
        assert_eq!(t.max_concurrent(), 1);
        assert_eq!(t.delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_bounded_clamps_zero() {
        assert_eq!(Throttle::bounded(0, Duration::ZERO).max_concurrent(), 1);
    }

    #[test]
    fn test_first_batch_does_not_wait() {
        let t = Throttle::bounded(3, Duration::from_millis(10));
        assert!(!t.must_wait(0));
        assert!(!t.must_wait(2));
        assert!(t.must_wait(3));
        assert!(!Throttle::sequential(Duration::ZERO).must_wait(5));
    }
}

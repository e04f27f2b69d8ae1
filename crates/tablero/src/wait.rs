//! Wait primitives: bounded polling and bounded retry backoff.
//!
//! Two kinds of suspension exist in the harness. Conditions with an
//! observable DOM signal (modal attach/detach, option visibility, board
//! readiness) poll with a deadline. Mutations with no completion signal get
//! a fixed settle delay instead; the delay is the upper-bound contract a
//! real signal would replace.

use std::time::Duration;

/// Default timeout for required waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Options for a polled wait
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with a specific timeout
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
            ..Self::default()
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a Duration
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Bounded retry schedule with linearly increasing backoff.
///
/// Yields one delay per attempt: zero for the first, then `base`,
/// `2 * base`, and so on, up to `max_attempts` items. The generic
/// "find first matching candidate under eventual consistency" loops
/// (fixture discovery) iterate over this.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl Backoff {
    /// Create a schedule of `max_attempts` attempts with base delay `base`
    #[must_use]
    pub const fn new(base: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            max_attempts,
            attempt: 0,
        }
    }

    /// Attempts remaining in the schedule
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempt)
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let delay = self.base.saturating_mul(self.attempt);
        self.attempt += 1;
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_options_builder() {
        let options = WaitOptions::new()
            .with_timeout(5_000)
            .with_poll_interval(50);
        assert_eq!(options.timeout_duration(), Duration::from_secs(5));
        assert_eq!(options.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn backoff_is_zero_then_increasing() {
        let delays: Vec<Duration> = Backoff::new(Duration::from_secs(2), 3).collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_secs(2),
                Duration::from_secs(4),
            ]
        );
    }

    #[test]
    fn backoff_is_bounded() {
        assert_eq!(Backoff::new(Duration::from_millis(10), 0).count(), 0);
        assert_eq!(Backoff::new(Duration::from_millis(10), 5).count(), 5);
    }

    #[test]
    fn backoff_reports_remaining() {
        let mut backoff = Backoff::new(Duration::from_secs(1), 3);
        assert_eq!(backoff.remaining(), 3);
        let _ = backoff.next();
        assert_eq!(backoff.remaining(), 2);
    }
}

//! # Retry Policy
//!
//! Bounded retry with a fixed delay between attempts. Slow hardware (a
//! Raspberry Pi driving a USB printer, a CUPS queue still waking up) often
//! rejects the first submission and accepts the next one.

use std::io;
use std::thread;
use std::time::Duration;

/// Default number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// When and how often to resubmit a job.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub max_attempts: u32,
    /// Sleep between attempts
    pub delay: Duration,
    /// Whether an error is worth another attempt
    pub retryable: fn(&io::Error) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            retryable: is_transient,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Self::default()
        }
    }

    /// Retry without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_retryable(mut self, retryable: fn(&io::Error) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Attempts to make, never less than one.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    #[inline]
    pub fn should_retry(&self, error: &io::Error) -> bool {
        (self.retryable)(error)
    }

    /// Block for the configured delay.
    pub fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Default predicate: everything except errors another attempt cannot fix.
pub fn is_transient(error: &io::Error) -> bool {
    !matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::immediate(0).attempts(), 1);
    }

    #[test]
    fn test_transient_kinds() {
        assert!(is_transient(&io::Error::new(io::ErrorKind::TimedOut, "busy")));
        assert!(is_transient(&io::Error::new(io::ErrorKind::NotFound, "no device")));
        assert!(is_transient(&io::Error::other("lp exited with status 1")));
        assert!(!is_transient(&io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        assert!(!is_transient(&io::Error::new(io::ErrorKind::InvalidInput, "bad name")));
    }

    #[test]
    fn test_custom_predicate() {
        let policy = RetryPolicy::immediate(3).with_retryable(|_| false);
        assert!(!policy.should_retry(&io::Error::other("anything")));
    }
}

//! Retry policy and per-attempt outcome.

use std::time::Duration;

/// Fixed-interval retry policy. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Sleep between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Outcome of a single attempt, classified by the operation itself.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Succeeded with a value; stop immediately.
    Done(T),
    /// Failed in a way worth retrying.
    Retry(anyhow::Error),
    /// Failed definitively; abort without further attempts.
    Fatal(anyhow::Error),
}

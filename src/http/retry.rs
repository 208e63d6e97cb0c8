//! Bounded retry loop for network operations.
//!
//! Every failure is retried the same way: there is no classification of
//! errors and no delay between attempts.

use anyhow::Result;
use log::{debug, warn};

/// Number of additional attempts after the first failure.
pub const DEFAULT_RETRIES: usize = 2;

/// How many times an operation is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: usize,
}

impl RetryPolicy {
    pub fn new(retries: usize) -> Self {
        Self { retries }
    }

    pub fn retries(&self) -> usize {
        self.retries
    }

    /// Total attempts allowed, always at least one.
    pub fn max_attempts(&self) -> usize {
        self.retries.saturating_add(1)
    }

    /// Runs `operation` until it succeeds or `max_attempts` have failed.
    /// The error of the final attempt is returned unchanged.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts();

        for attempt in 1..max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    debug!(
                        "{}: attempt {}/{} failed ({:#}), retrying...",
                        operation_name, attempt, max_attempts, e
                    );
                }
            }
        }

        operation().await.inspect_err(|e| {
            warn!(
                "{}: giving up after {} attempt(s): {:#}",
                operation_name, max_attempts, e
            );
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES)
    }
}

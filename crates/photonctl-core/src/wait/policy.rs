//! Timeout and retry policy shared by the task poller and the readiness waiter

use std::time::Duration;
use tracing::warn;

use crate::api::ApiError;
use crate::error::CoreError;

/// Wall-clock budget for a single wait
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Delay between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Consecutive transient fetch failures tolerated before giving up
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// How often the progress reporter redraws
pub const DEFAULT_PROGRESS_TICK: Duration = Duration::from_millis(200);

/// How long to wait, how often to look, and how many failed looks to tolerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
    pub retry_budget: u32,
    pub progress_tick: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
            retry_budget: DEFAULT_RETRY_BUDGET,
            progress_tick: DEFAULT_PROGRESS_TICK,
        }
    }
}

impl WaitPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }
}

/// Counts consecutive transient fetch failures within one wait
#[derive(Debug)]
pub struct RetryBudget {
    budget: u32,
    failures: u32,
}

impl RetryBudget {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            failures: 0,
        }
    }

    /// Record a failed fetch.
    ///
    /// Structural errors (not found, rejected request, undecodable body) are
    /// returned immediately. Transient errors are absorbed until more than
    /// `budget` of them happened in a row.
    pub fn record_failure(&mut self, what: &str, err: ApiError) -> Result<(), CoreError> {
        if !err.is_transient() {
            return Err(CoreError::Api(err));
        }

        self.failures += 1;
        if self.failures > self.budget {
            return Err(CoreError::RetriesExhausted {
                what: what.to_string(),
                attempts: self.failures,
                source: err,
            });
        }

        warn!(
            "Failed to fetch {} ({}/{} retries): {}",
            what, self.failures, self.budget, err
        );
        Ok(())
    }

    /// A fetch succeeded
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

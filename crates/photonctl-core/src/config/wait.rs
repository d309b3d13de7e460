//! Per-profile wait settings
//!
//! Stored under `[profiles.<name>.wait]` and converted into a [`WaitPolicy`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{ConfigError, Result};
use crate::wait::WaitPolicy;
use crate::wait::policy::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_RETRY_BUDGET};

/// Wait configuration for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Give up after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds between status fetches
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Consecutive transient failures tolerated
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
            retry_budget: default_retry_budget(),
        }
    }
}

impl WaitConfig {
    pub fn to_policy(&self) -> Result<WaitPolicy> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidWait(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidWait(
                "interval_secs must be greater than 0".to_string(),
            ));
        }

        Ok(WaitPolicy::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_interval(Duration::from_secs(self.interval_secs))
            .with_retry_budget(self.retry_budget))
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_POLL_TIMEOUT.as_secs()
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_retry_budget() -> u32 {
    DEFAULT_RETRY_BUDGET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let policy = WaitConfig::default().to_policy().unwrap();
        let defaults = WaitPolicy::default();
        assert_eq!(policy.timeout, defaults.timeout);
        assert_eq!(policy.interval, defaults.interval);
        assert_eq!(policy.retry_budget, defaults.retry_budget);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: WaitConfig = toml::from_str("timeout_secs = 900").unwrap();
        assert_eq!(config.timeout_secs, 900);
        assert_eq!(config.interval_secs, 2);
        assert_eq!(config.retry_budget, 3);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = WaitConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.to_policy(),
            Err(ConfigError::InvalidWait(_))
        ));
    }
}

//! Unified error handling for photonctl-core
//!
//! # Example
//!
//! ```rust
//! use photonctl_core::{ApiError, CoreError};
//!
//! let err: CoreError = ApiError::NotFound { message: "cluster c-1".to_string() }.into();
//! assert!(err.is_not_found());
//! assert!(!err.is_timeout());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A request failed and was not retried
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The task itself reported a failure state
    #[error("Task {} failed with state {}{}", .task_id, .state, detail_suffix(.message))]
    TaskFailed {
        task_id: String,
        state: String,
        message: Option<String>,
    },

    /// The observed resource entered an error state
    #[error("{kind} {id} entered {state} state")]
    ResourceFailed {
        kind: String,
        id: String,
        state: String,
    },

    /// No terminal state was observed within the wait budget
    #[error("Timed out after {timeout:?} while waiting for {what}")]
    WaitTimeout { what: String, timeout: Duration },

    /// Too many consecutive transient fetch failures
    #[error("Giving up on {what} after {attempts} failed requests: {source}")]
    RetriesExhausted {
        what: String,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    /// Input rejected before any remote call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Api(e) if e.is_not_found())
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::WaitTimeout { .. })
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// Returns true if running the same command again could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_transient(),
            CoreError::WaitTimeout { .. } | CoreError::RetriesExhausted { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_task_failed_display() {
        let err = CoreError::TaskFailed {
            task_id: "task-1".to_string(),
            state: "ERROR".to_string(),
            message: Some("VmCreateFailed: no capacity".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Task task-1 failed with state ERROR: VmCreateFailed: no capacity"
        );

        let err = CoreError::TaskFailed {
            task_id: "task-2".to_string(),
            state: "ERROR".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "Task task-2 failed with state ERROR");
    }

    #[test]
    fn test_resource_failed_names_resource() {
        let err = CoreError::ResourceFailed {
            kind: "Cluster".to_string(),
            id: "c-1".to_string(),
            state: "ERROR".to_string(),
        };
        assert_eq!(err.to_string(), "Cluster c-1 entered ERROR state");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retries_exhausted_keeps_source() {
        let err = CoreError::RetriesExhausted {
            what: "task task-1".to_string(),
            attempts: 4,
            source: ApiError::Http {
                status: 503,
                code: None,
                message: "unavailable".to_string(),
            },
        };
        assert!(err.is_retryable());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("after 4 failed requests"));
    }

    #[test]
    fn test_timeout_and_validation_helpers() {
        let err = CoreError::WaitTimeout {
            what: "cluster c-1 to become READY".to_string(),
            timeout: Duration::from_secs(6),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().starts_with("Timed out after 6s"));

        let err = CoreError::Validation("worker count must be positive".to_string());
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }
}

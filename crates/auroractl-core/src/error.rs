//! Unified error handling for auroractl-core
//!
//! Every failure is fatal to the workflow that raised it. Helper methods let
//! callers classify errors without matching on every variant.
//!
//! # Example
//!
//! ```rust
//! use auroractl_core::{CoreError, ResourceKind};
//!
//! let err = CoreError::NotFound {
//!     kind: ResourceKind::Cluster,
//!     identifier: "orders".to_string(),
//! };
//! assert!(err.is_not_found());
//! assert!(!err.is_configuration());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use crate::rds::ResourceKind;

/// Core error type for RDS operations and workflows
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required argument combination is missing. Raised before any remote call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A mutating call was not acknowledged with HTTP 200
    #[error("failed to {operation} {identifier} with status code {status_code}{}", detail(.code, .message))]
    OperationFailed {
        operation: &'static str,
        identifier: String,
        status_code: u16,
        code: Option<String>,
        message: Option<String>,
    },

    /// The resource does not exist in the control plane
    #[error("{kind} '{identifier}' not found")]
    NotFound {
        kind: ResourceKind,
        identifier: String,
    },

    /// A read-only describe call failed
    #[error("Failed to describe {kind} '{identifier}': {message}")]
    Describe {
        kind: ResourceKind,
        identifier: String,
        message: String,
    },

    /// The control plane reported a status this tool does not know
    #[error("Unrecognized {kind} status '{value}'")]
    UnknownStatus { kind: ResourceKind, value: String },

    /// A bounded poll ran out of attempts or time
    #[error("Gave up waiting for {resource} after {attempts} attempts ({elapsed:?})")]
    PollTimeout {
        resource: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// The request never produced an HTTP response (dispatch, timeout, credentials)
    #[error("AWS SDK error during {operation}: {message}")]
    Sdk {
        operation: &'static str,
        message: String,
    },

    /// Profile/config file problem
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn detail(code: &Option<String>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(" ({code}: {message})"),
        (Some(code), None) => format!(" ({code})"),
        (None, Some(message)) => format!(" ({message})"),
        (None, None) => String::new(),
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if the resource was not found
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true for argument/config problems detected before any remote call
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, CoreError::Configuration(_) | CoreError::Config(_))
    }

    /// Returns true if a bounded poll gave up
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::PollTimeout { .. })
    }

    /// HTTP status code of a rejected mutating call, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CoreError::OperationFailed { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failed_display() {
        let err = CoreError::OperationFailed {
            operation: "clone",
            identifier: "orders".to_string(),
            status_code: 400,
            code: Some("InvalidParameterValue".to_string()),
            message: Some("bad subnet".to_string()),
        };

        let msg = err.to_string();
        assert!(msg.contains("failed to clone orders with status code 400"));
        assert!(msg.contains("InvalidParameterValue: bad subnet"));
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn test_operation_failed_display_without_detail() {
        let err = CoreError::OperationFailed {
            operation: "snapshot",
            identifier: "orders".to_string(),
            status_code: 503,
            code: None,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "failed to snapshot orders with status code 503"
        );
    }

    #[test]
    fn test_classification_helpers() {
        let not_found = CoreError::NotFound {
            kind: ResourceKind::Instance,
            identifier: "orders-instance".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_timeout());
        assert_eq!(not_found.status_code(), None);

        let config = CoreError::Configuration("it requires suffix or a new identifier".into());
        assert!(config.is_configuration());
        assert!(!config.is_not_found());

        let timeout = CoreError::PollTimeout {
            resource: "cluster orders".to_string(),
            attempts: 3,
            elapsed: Duration::from_secs(180),
        };
        assert!(timeout.is_timeout());
        assert!(timeout.to_string().contains("3 attempts"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: CoreError = ConfigError::ProfileNotFound {
            name: "prod".to_string(),
        }
        .into();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("prod"));
    }
}

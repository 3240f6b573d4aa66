//! Polling settings stored in profiles

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, Result};
use crate::progress::{DEFAULT_INTERVAL, WaitConfig};

/// How workflows wait for resources
///
/// Omitted caps mean waiting until the resource gets there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between status checks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of status checks per wait
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Maximum seconds per wait
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: None,
            timeout_secs: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}

impl PollSettings {
    /// Convert to the poller's configuration
    pub fn to_wait_config(&self) -> Result<WaitConfig> {
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "polling.max_attempts",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(WaitConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

//! Progress tracking and status polling for asynchronous RDS changes
//!
//! Every mutating RDS call returns immediately while the change happens in the
//! background. This module re-checks a condition at a fixed interval until it
//! holds, with optional progress callbacks for UI updates.
//!
//! By default the wait is unbounded: every initiated cloud operation is
//! trusted to finish eventually, and only process termination stops a wait.
//! [`WaitConfig`] can cap attempts or elapsed time.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{CoreError, Result};

/// Default time between status checks (60 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// How long and how often to wait for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Fixed delay between checks
    pub interval: Duration,
    /// Give up after this many checks
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed
    pub timeout: Option<Duration>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }
}

impl WaitConfig {
    /// Whether this configuration waits forever
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.timeout.is_none()
    }
}

/// Progress events emitted while waiting on a resource
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Waiting has begun
    Started { resource: String },
    /// A check came back negative
    Polling {
        resource: String,
        attempt: u32,
        elapsed: Duration,
    },
    /// The condition holds
    Ready {
        resource: String,
        attempts: u32,
        elapsed: Duration,
    },
    /// The wait ended with an error
    Failed { resource: String, error: String },
}

/// Callback type for progress updates
///
/// CLI can use this to update spinners/progress bars.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Poll `check` until it returns `true`.
///
/// `check` runs at least once and then once per `config.interval`. Returns the
/// number of checks made. An error from `check` ends the wait immediately and
/// is returned unchanged. `CoreError::PollTimeout` is only possible when the
/// config carries a cap.
///
/// # Example
///
/// ```rust,ignore
/// use auroractl_core::{poll_until, SystemClock, WaitConfig};
///
/// let attempts = poll_until(
///     &SystemClock,
///     &WaitConfig::default(),
///     "cluster orders available",
///     || prober.cluster_is("orders", ClusterStatus::Available),
///     None,
/// )
/// .await?;
/// ```
pub async fn poll_until<C, F, Fut>(
    clock: &C,
    config: &WaitConfig,
    resource: &str,
    mut check: F,
    on_progress: Option<&ProgressCallback>,
) -> Result<u32>
where
    C: Clock + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = clock.now();
    let mut attempts = 0u32;

    emit(
        on_progress,
        ProgressEvent::Started {
            resource: resource.to_string(),
        },
    );

    loop {
        attempts += 1;

        match check().await {
            Ok(true) => {
                let elapsed = clock.now() - start;
                debug!(resource, attempts, ?elapsed, "Resource ready");
                emit(
                    on_progress,
                    ProgressEvent::Ready {
                        resource: resource.to_string(),
                        attempts,
                        elapsed,
                    },
                );
                return Ok(attempts);
            }
            Ok(false) => {
                let elapsed = clock.now() - start;
                emit(
                    on_progress,
                    ProgressEvent::Polling {
                        resource: resource.to_string(),
                        attempt: attempts,
                        elapsed,
                    },
                );

                let out_of_attempts = config.max_attempts.is_some_and(|max| attempts >= max);
                let out_of_time = config
                    .timeout
                    .is_some_and(|timeout| elapsed + config.interval > timeout);
                if out_of_attempts || out_of_time {
                    let err = CoreError::PollTimeout {
                        resource: resource.to_string(),
                        attempts,
                        elapsed,
                    };
                    warn!(resource, attempts, ?elapsed, "Giving up waiting");
                    emit(
                        on_progress,
                        ProgressEvent::Failed {
                            resource: resource.to_string(),
                            error: err.to_string(),
                        },
                    );
                    return Err(err);
                }

                debug!(
                    resource,
                    attempt = attempts,
                    delay_secs = config.interval.as_secs(),
                    "Resource not ready, retrying"
                );
                clock.sleep(config.interval).await;
            }
            Err(err) => {
                warn!(resource, error = %err, "Resource check failed");
                emit(
                    on_progress,
                    ProgressEvent::Failed {
                        resource: resource.to_string(),
                        error: err.to_string(),
                    },
                );
                return Err(err);
            }
        }
    }
}

/// Helper to emit progress events
fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

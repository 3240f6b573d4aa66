//! Time source for polling and snapshot naming

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Boxed future returned by [`Clock::sleep`]
pub type Sleep<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Source of monotonic time, wall-clock time and delays
pub trait Clock: Send + Sync {
    /// Monotonic now, used to measure elapsed polling time
    fn now(&self) -> Instant;

    /// Wait for `duration`
    fn sleep(&self, duration: Duration) -> Sleep<'_>;

    /// Local wall-clock time, used to stamp snapshot names
    fn local_now(&self) -> DateTime<Local>;
}

/// Real time backed by tokio and the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Sleep<'_> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Virtual time: `sleep` returns immediately and advances the clock.
///
/// Lets tests drive unbounded waits without real delays.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    wall: DateTime<Local>,
    advanced: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// A clock whose wall time starts at `wall`
    pub fn new(wall: DateTime<Local>) -> Self {
        Self {
            origin: Instant::now(),
            wall,
            advanced: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Total virtual time slept so far
    pub fn elapsed(&self) -> Duration {
        *self.advanced.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn advance(&self, duration: Duration) {
        *self.advanced.lock().unwrap_or_else(|e| e.into_inner()) += duration;
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Sleep<'_> {
        self.advance(duration);
        Box::pin(std::future::ready(()))
    }

    fn local_now(&self) -> DateTime<Local> {
        let advanced = chrono::Duration::from_std(self.elapsed()).unwrap_or_default();
        self.wall + advanced
    }
}

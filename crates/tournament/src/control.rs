//! Run control for long tournaments.
//!
//! A bracket checks its [`RunControl`] before each round. Battles inside a
//! round are cheap, so one round is the cancellation granularity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Shared stop flag with an optional time budget.
///
/// Clones share the same flag and clock, so a handle can be passed to another
/// thread and used to stop a run that is in progress.
#[derive(Debug, Clone)]
pub struct RunControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    /// When the run started
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Budget for the whole run (None = unlimited)
    time_limit: Option<Duration>,
}

impl RunControl {
    /// # Arguments
    /// * `time_limit` - Maximum wall time for the run (None = unlimited)
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
        }
    }

    /// Start the clock. A stop requested earlier stays in effect.
    pub fn start(&self) {
        *self
            .start_time
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    /// Request that the run stop before its next round.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Whether the run should stop, checking the time budget as well as the
    /// flag. An expired budget sets the flag.
    pub fn check(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let (Some(limit), Some(elapsed)) = (self.time_limit, self.started_elapsed()) {
            if elapsed >= limit {
                self.stop();
                return true;
            }
        }
        false
    }

    /// Time since `start()`, zero if the clock has not started.
    pub fn elapsed(&self) -> Duration {
        self.started_elapsed().unwrap_or(Duration::ZERO)
    }

    /// Remaining budget (None if unlimited).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn started_elapsed(&self) -> Option<Duration> {
        self.start_time
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|start| start.elapsed())
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod control_tests;

//! Core traits for injecting time into the ledger
//!
//! Snapshots, sub-event records and wallet timestamps all read the current
//! time through a [`Clock`], so tests and replays can drive time explicitly
//! while production code uses the system clock.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current time
///
/// Implementations must be safe to share between threads because a single
/// ledger instance is shared by every caller.
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to `at`
    ///
    /// Moving backwards is allowed; the balance ledger clamps snapshot
    /// timestamps so that per-account history stays ordered.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    /// Move forward by `step`
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += step;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

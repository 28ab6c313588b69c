#![forbid(unsafe_code)]

//! Wall-clock timestamps and the clock seam used to stamp mutations.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of timestamps for `updatedAt` stamping.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
///
/// Uses `web_time` so it also works on `wasm32-unknown-unknown`, where
/// `std::time::SystemTime::now` panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let since_epoch = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Deterministic clock for tests and replays.
///
/// Every call to [`Clock::now`] returns the current value and then advances it
/// by `step` milliseconds.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Cell<u64>,
    step: u64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Set the value returned by the next call to `now`.
    pub fn set(&self, millis: u64) {
        self.next.set(millis);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let current = self.next.get();
        self.next.set(current.saturating_add(self.step));
        Timestamp(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_by_step() {
        let clock = ManualClock::new(100, 5);
        assert_eq!(clock.now(), Timestamp(100));
        assert_eq!(clock.now(), Timestamp(105));
        clock.set(7);
        assert_eq!(clock.now(), Timestamp(7));
    }

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now() > Timestamp(1_577_836_800_000));
    }
}

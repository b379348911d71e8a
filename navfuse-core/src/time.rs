//! Time management for the estimation loop
//!
//! Provides clock implementations for the deadline scheduler:
//! - Fixed, owned clock (simulation, replay)
//! - Shared manual clock (tests that advance time from outside)
//! - Monotonic system clock (when `std` is available)

use core::cell::Cell;

pub use crate::traits::TimeSource;

/// Timestamp in milliseconds since an arbitrary monotonic origin (usually boot)
pub type Timestamp = u64;

/// Fixed time source for replay and simulation
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Clock advanced through a shared reference
///
/// Lets a test hold `&ManualClock` while the scheduler owns another
/// reference to it.
#[derive(Debug, Default)]
pub struct ManualClock {
    timestamp: Cell<Timestamp>,
}

impl ManualClock {
    /// Clock starting at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Cell::new(timestamp),
        }
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get().saturating_add(ms));
    }

    /// Jump to `timestamp`; earlier values are ignored to stay monotonic
    pub fn set(&self, timestamp: Timestamp) {
        if timestamp > self.timestamp.get() {
            self.timestamp.set(timestamp);
        }
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Monotonic clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Clock whose origin is the moment of creation
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Milliseconds from `now` until `deadline`, zero once it has passed
pub fn remaining_ms(now: Timestamp, deadline: Timestamp) -> u64 {
    deadline.saturating_sub(now)
}

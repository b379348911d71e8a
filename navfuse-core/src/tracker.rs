//! Lock-Free Sensor Update Tracker
//!
//! ## Overview
//!
//! The tracker is the only state shared between sensor-arrival contexts
//! (driver callbacks, interrupt handlers) and the estimation task. It holds
//! one bit per sensor class meaning "a fresh, not yet consumed sample
//! exists", plus a flag asking the scheduler to run.
//!
//! ## Why Lock-Free?
//!
//! Arrival callbacks run at interrupt or high event priority. A mutex here
//! would let a low-priority holder block them (priority inversion), so both
//! sides use single interlocked instructions instead:
//!
//! ```text
//! Arrival context                    Estimation task
//!      ↓                                  ↓
//!   fetch_or(bit) ───→ AtomicU16 ←─── swap(0)
//!      ↓                                  ↓
//!   never blocks                     never blocks
//! ```
//!
//! ## No-Loss Guarantee
//!
//! Consuming the mask is a single `swap(0)`. All read-modify-write
//! operations on one atomic are totally ordered, so every `fetch_or` lands
//! either before the swap (its bit is returned by this take) or after it
//! (its bit survives into the next take). A load followed by a separate
//! clear would open a window in which a `mark` is erased without ever being
//! observed; the tracker never does that.
//!
//! ## Memory Ordering
//!
//! - `mark` uses `Release` so the sample written by the driver before the
//!   notification is visible to whoever takes the bit
//! - `take_and_clear` uses `AcqRel` to pair with it
//! - the dispatch flag follows the same pattern

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use crate::sensors::{SensorClass, SensorMask};

/// Process-wide record of which sensor classes have unread samples
///
/// Usable from a `static`:
///
/// ```rust
/// use navfuse_core::{SensorClass, UpdateTracker};
///
/// static TRACKER: UpdateTracker = UpdateTracker::new();
///
/// // Driver callback
/// TRACKER.mark(SensorClass::Accel);
///
/// // Estimation task
/// let fresh = TRACKER.take_and_clear();
/// assert!(fresh.has(SensorClass::Accel));
/// assert!(TRACKER.take_and_clear().is_empty());
/// ```
#[derive(Debug)]
pub struct UpdateTracker {
    /// Fresh-sample bits
    pending: AtomicU16,

    /// Set by every arrival, consumed by the scheduler
    dispatch_requested: AtomicBool,

    /// Total arrivals, for diagnostics only
    marks: AtomicU32,
}

impl UpdateTracker {
    /// Create an empty tracker
    pub const fn new() -> Self {
        Self {
            pending: AtomicU16::new(0),
            dispatch_requested: AtomicBool::new(false),
            marks: AtomicU32::new(0),
        }
    }

    /// Record a fresh sample for `class` and request a pipeline run
    ///
    /// Callable from any context, never blocks.
    pub fn mark(&self, class: SensorClass) {
        self.mark_mask(class.bit());
    }

    /// Record fresh samples for every class in `mask`
    pub fn mark_mask(&self, mask: SensorMask) {
        let bits = mask.intersection(SensorMask::SENSORS).bits();
        if bits == 0 {
            return;
        }
        self.pending.fetch_or(bits, Ordering::Release);
        self.marks.fetch_add(1, Ordering::Relaxed);
        self.dispatch_requested.store(true, Ordering::Release);
    }

    /// Atomically read the pending set and clear exactly the bits returned
    pub fn take_and_clear(&self) -> SensorMask {
        SensorMask::from_bits(self.pending.swap(0, Ordering::AcqRel))
    }

    /// Consume the run request raised by `mark`
    ///
    /// Returns true at most once per burst of arrivals.
    pub fn take_dispatch_request(&self) -> bool {
        self.dispatch_requested.swap(false, Ordering::AcqRel)
    }

    /// Current pending set without consuming it
    ///
    /// Only meaningful for diagnostics; the value may be stale immediately.
    pub fn peek(&self) -> SensorMask {
        SensorMask::from_bits(self.pending.load(Ordering::Acquire))
    }

    /// Number of `mark` calls since creation
    pub fn mark_count(&self) -> u32 {
        self.marks.load(Ordering::Relaxed)
    }
}

impl Default for UpdateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//! Time Source Abstraction
//!
//! The scheduler only needs a monotonic millisecond counter to arm and test
//! deadlines. Wall-clock time never enters the run path.
//!
//! ## Common Implementations
//!
//! - `FixedTime`: owned, manually advanced clock
//! - `ManualClock`: shared clock advanced through `&self`, for tests and
//!   simulation
//! - `MonotonicClock`: `std::time::Instant` based (requires `std`)

use crate::time::Timestamp;

/// Monotonic millisecond clock
///
/// ## Implementation Requirements
///
/// - `now()` must never decrease
/// - Counter wraparound must not happen within the process lifetime
///   (a `u64` of milliseconds is enough)
///
/// ## Example Implementation
///
/// ```rust
/// use navfuse_core::traits::TimeSource;
/// use navfuse_core::time::Timestamp;
///
/// struct TickCounter {
///     ticks_per_ms: u64,
/// }
///
/// impl TimeSource for TickCounter {
///     fn now(&self) -> Timestamp {
///         let ticks = 0; // read the hardware timer here
///         ticks / self.ticks_per_ms
///     }
/// }
/// ```
pub trait TimeSource {
    /// Milliseconds since an arbitrary, fixed origin
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

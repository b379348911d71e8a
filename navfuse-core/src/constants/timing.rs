//! Timing Constants
//!
//! Cadence of the deadline scheduler.

/// Default re-arm timeout (milliseconds).
///
/// The estimator runs at least this often even when every sensor is
/// silent, so the liveness alarm reacts within one period.
pub const DEFAULT_TIMEOUT_MS: u32 = 100;

/// Smallest accepted re-arm timeout (milliseconds).
///
/// Below one tick the scheduler would run back to back on timeouts alone.
pub const MIN_TIMEOUT_MS: u32 = 1;

/// Largest accepted re-arm timeout (milliseconds).
///
/// A liveness check slower than this is useless for flight control.
pub const MAX_TIMEOUT_MS: u32 = 10_000;

//! Buffer Capacities
//!
//! Fixed sizes for the heapless collections on the run path.

/// Number of sensor classes tracked by the update bitmask.
pub const SENSOR_CLASS_COUNT: usize = 7;

/// Maximum number of filter units in one chain.
///
/// The full deployment uses seven estimators; one slot is spare for
/// vehicle-specific units.
pub const MAX_FILTER_UNITS: usize = 8;

//! Constants for the Estimation Core
//!
//! Every numeric value the scheduler, sanity gate and linearizer depend on
//! is defined here with its unit in the name.
//!
//! ## Organization
//!
//! - **Geodesy**: Earth model and coordinate plausibility limits
//! - **Timing**: Scheduler cadence
//! - **Buffers**: Fixed capacities for heap-free collections

/// Earth model and geodetic limits.
pub mod geodesy;

/// Scheduler timing parameters.
pub mod timing;

/// Fixed capacities for the run path.
pub mod buffers;

pub use geodesy::{EARTH_EQUATORIAL_RADIUS_M, NULL_FIX_EPSILON_DEG};
pub use timing::DEFAULT_TIMEOUT_MS;
pub use buffers::{MAX_FILTER_UNITS, SENSOR_CLASS_COUNT};

//! Sensor-fusion scheduling core for flight-controller state estimation
//!
//! Collects asynchronously arriving sensor samples, gates them through
//! per-sensor sanity checks, linearizes GPS positions around the home
//! location and drives the result through an ordered chain of pluggable
//! estimator units.
//!
//! Key constraints:
//! - Runs inside a cooperative real-time loop next to flight control
//! - Sensor-arrival contexts only ever touch one atomic bitmask
//! - No sensor or filter failure stops the estimator from producing output
//!
//! ```no_run
//! use navfuse_core::{
//!     DeadlineScheduler, EstimationSettings, FilterChain, UpdateTracker, SensorClass,
//! };
//! # use navfuse_core::{AlarmLevel, AlarmSink, AirspeedSample, GpsPosition, SensorSource};
//! # use navfuse_core::time::FixedTime;
//! # struct Bus;
//! # impl SensorSource for Bus {
//! #     fn gyro(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn accel(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn mag(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn gps_velocity(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn baro_altitude(&self) -> f32 { 0.0 }
//! #     fn airspeed(&self) -> AirspeedSample { AirspeedSample::default() }
//! #     fn gps_position(&self) -> GpsPosition { GpsPosition::default() }
//! # }
//! # struct Alarms;
//! # impl AlarmSink for Alarms { fn set_attitude_alarm(&mut self, _: AlarmLevel) {} }
//!
//! static TRACKER: UpdateTracker = UpdateTracker::new();
//!
//! let chain = FilterChain::builder().build().unwrap();
//! let mut scheduler = DeadlineScheduler::new(
//!     &TRACKER, Bus, Alarms, FixedTime::new(0), chain, &EstimationSettings::default(),
//! );
//! scheduler.start(None).unwrap();
//!
//! // Sensor driver context
//! TRACKER.mark(SensorClass::Gyro);
//!
//! // Estimation task
//! if let Ok(report) = scheduler.poll() {
//!     assert!(report.consumed.contains(SensorClass::Gyro.bit()));
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod alarm;
pub mod chain;
pub mod constants;
pub mod errors;
pub mod home;
pub mod sanity;
pub mod scheduler;
pub mod sensors;
pub mod settings;
pub mod time;
pub mod tracker;
pub mod traits;

#[cfg(feature = "std")]
pub mod runtime;

// Public API
pub use alarm::{AlarmLevel, LivenessAlarm};
pub use chain::{ChainBuilder, ChainMetrics, ChainReport, FilterChain, UnitFailure};
pub use errors::{
    EstimationError, EstimationResult, FilterError, FilterResult, SanityError, SanityResult,
};
pub use home::{GpsPosition, HomeLinearizer, HomeLocation, HomeReference};
pub use sanity::{GateOutcome, Rejection, SanityGate};
pub use scheduler::{DeadlineScheduler, RunReport, SchedulerState, SchedulerStats, Trigger};
pub use sensors::{AirspeedSample, SensorClass, SensorMask, SensorSnapshot};
pub use settings::{EstimationSettings, FilterKind, FusionAlgorithm};
pub use tracker::UpdateTracker;
pub use traits::{AlarmSink, FilterFactory, FilterUnit, SensorSource, TimeSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}

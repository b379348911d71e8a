//! External Collaborators
//!
//! The publish/subscribe object bus that delivers samples and the system
//! alarm table both live outside this crate. The scheduler reaches them
//! through the two traits below and never owns their update cadence.

use crate::alarm::AlarmLevel;
use crate::home::GpsPosition;
use crate::sensors::AirspeedSample;

/// Read access to the latest sample of each sensor class
///
/// Reads return whatever the bus holds right now; the update tracker
/// decides whether that value is fresh. Implementations must not block.
///
/// ```rust
/// use navfuse_core::{AirspeedSample, GpsPosition, SensorSource};
///
/// struct Bench;
///
/// impl SensorSource for Bench {
///     fn gyro(&self) -> [f32; 3] { [0.0; 3] }
///     fn accel(&self) -> [f32; 3] { [0.0, 0.0, -9.81] }
///     fn mag(&self) -> [f32; 3] { [0.2, 0.0, 0.4] }
///     fn gps_velocity(&self) -> [f32; 3] { [0.0; 3] }
///     fn baro_altitude(&self) -> f32 { 120.0 }
///     fn airspeed(&self) -> AirspeedSample { AirspeedSample::default() }
///     fn gps_position(&self) -> GpsPosition { GpsPosition::default() }
/// }
/// ```
pub trait SensorSource {
    /// Angular rate (deg/s), body frame
    fn gyro(&self) -> [f32; 3];

    /// Specific force (m/s²), body frame
    fn accel(&self) -> [f32; 3];

    /// Magnetic field, body frame
    fn mag(&self) -> [f32; 3];

    /// GPS velocity (m/s), north/east/down
    fn gps_velocity(&self) -> [f32; 3];

    /// Barometric altitude (m)
    fn baro_altitude(&self) -> f32;

    /// Calibrated airspeed with the sensor's connected flag
    fn airspeed(&self) -> AirspeedSample;

    /// Geodetic GPS fix
    fn gps_position(&self) -> GpsPosition;
}

impl<T: SensorSource + ?Sized> SensorSource for &T {
    fn gyro(&self) -> [f32; 3] {
        (**self).gyro()
    }

    fn accel(&self) -> [f32; 3] {
        (**self).accel()
    }

    fn mag(&self) -> [f32; 3] {
        (**self).mag()
    }

    fn gps_velocity(&self) -> [f32; 3] {
        (**self).gps_velocity()
    }

    fn baro_altitude(&self) -> f32 {
        (**self).baro_altitude()
    }

    fn airspeed(&self) -> AirspeedSample {
        (**self).airspeed()
    }

    fn gps_position(&self) -> GpsPosition {
        (**self).gps_position()
    }
}

/// System alarm table entry for attitude-estimation liveness
///
/// Only the deadline scheduler calls this, once per run.
pub trait AlarmSink {
    /// Publish the current liveness level
    fn set_attitude_alarm(&mut self, level: AlarmLevel);
}

impl<T: AlarmSink + ?Sized> AlarmSink for &mut T {
    fn set_attitude_alarm(&mut self, level: AlarmLevel) {
        (**self).set_attitude_alarm(level)
    }
}

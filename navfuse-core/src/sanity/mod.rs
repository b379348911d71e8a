//! Per-Sensor Sanity Gate
//!
//! ## Overview
//!
//! Before any filter sees a sample, the gate decides whether it is usable
//! for this run. Every class with a fresh-sample bit is read from the
//! sensor bus and checked; a class that fails has its bit cleared and its
//! field left unpopulated. The run goes on without it; no rejection ever
//! aborts a run.
//!
//! ## Checks per Class
//!
//! | Class                              | Well-formed | Extra condition                        |
//! |------------------------------------|-------------|----------------------------------------|
//! | gyro, accel, mag, velocity         | 3 scalars   | none                                   |
//! | baro altitude                      | 1 scalar    | none                                   |
//! | airspeed                           | 1 scalar    | sensor reports itself connected        |
//! | position                           | 3 scalars   | home configured, fix not null, in range |
//!
//! "Well-formed" means finite: NaN and ±∞ are rejected.
//!
//! ## Null Fix Detection
//!
//! A receiver that has not acquired yet publishes an all-zero position.
//! A fix whose latitude and longitude are both within
//! [`NULL_FIX_EPSILON_DEG`] of zero is treated as that placeholder.
//! Latitude and longitude are tested independently; a real fix on the
//! equator or on the prime meridian alone passes. Altitude is not part of
//! the test since sea level is a legitimate reading.
//!
//! ## Usage Example
//!
//! ```rust
//! use navfuse_core::{SanityGate, SensorMask, HomeLinearizer};
//! # use navfuse_core::{AirspeedSample, GpsPosition, SensorSource};
//! # struct Bus;
//! # impl SensorSource for Bus {
//! #     fn gyro(&self) -> [f32; 3] { [0.1, 0.0, 0.0] }
//! #     fn accel(&self) -> [f32; 3] { [0.0, 0.0, f32::NAN] }
//! #     fn mag(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn gps_velocity(&self) -> [f32; 3] { [0.0; 3] }
//! #     fn baro_altitude(&self) -> f32 { 0.0 }
//! #     fn airspeed(&self) -> AirspeedSample { AirspeedSample::default() }
//! #     fn gps_position(&self) -> GpsPosition { GpsPosition::default() }
//! # }
//!
//! let gate = SanityGate::default();
//! let home = HomeLinearizer::new();
//! let outcome = gate.apply(SensorMask::GYRO | SensorMask::ACCEL, &Bus, &home);
//!
//! assert_eq!(outcome.snapshot.updated, SensorMask::GYRO);
//! assert_eq!(outcome.rejected, SensorMask::ACCEL);
//! ```

pub mod utils;

use heapless::Vec;

use crate::{
    constants::{
        buffers::SENSOR_CLASS_COUNT,
        geodesy::{LATITUDE_LIMIT_DEG, LONGITUDE_LIMIT_DEG, NULL_FIX_EPSILON_DEG},
    },
    errors::{SanityError, SanityResult},
    home::{GpsPosition, HomeLinearizer},
    sensors::{AirspeedSample, SensorClass, SensorMask, SensorSnapshot},
    traits::SensorSource,
};

/// One rejected sensor class and why
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    /// Class that was dropped from the run
    pub class: SensorClass,
    /// Reason it was dropped
    pub reason: SanityError,
}

/// Result of gating one run's fresh samples
#[derive(Debug, Clone)]
pub struct GateOutcome {
    /// Snapshot populated with the accepted samples
    pub snapshot: SensorSnapshot,
    /// Classes that had fresh samples going in
    pub consumed: SensorMask,
    /// Classes that failed their checks
    pub rejected: SensorMask,
    /// Reason for each rejection, in class order
    pub rejections: Vec<Rejection, SENSOR_CLASS_COUNT>,
}

impl GateOutcome {
    /// Classes that made it into the snapshot
    pub fn accepted(&self) -> SensorMask {
        self.snapshot.updated
    }
}

/// Validation step between the sensor bus and the filter chain
#[derive(Debug, Clone, Copy)]
pub struct SanityGate {
    null_fix_epsilon_deg: f64,
}

impl Default for SanityGate {
    fn default() -> Self {
        Self {
            null_fix_epsilon_deg: NULL_FIX_EPSILON_DEG,
        }
    }
}

impl SanityGate {
    /// Gate with a custom null-fix tolerance (degrees)
    pub fn with_null_fix_epsilon(epsilon_deg: f64) -> Self {
        Self {
            null_fix_epsilon_deg: libm::fabs(epsilon_deg),
        }
    }

    /// Read and check every class flagged in `updated`
    pub fn apply<S>(&self, updated: SensorMask, sensors: &S, home: &HomeLinearizer) -> GateOutcome
    where
        S: SensorSource + ?Sized,
    {
        let updated = updated.intersection(SensorMask::SENSORS);
        let mut outcome = GateOutcome {
            snapshot: SensorSnapshot::new(),
            consumed: updated,
            rejected: SensorMask::empty(),
            rejections: Vec::new(),
        };

        for class in updated.classes() {
            let result = {
                let snapshot = &mut outcome.snapshot;
                match class {
                    SensorClass::Gyro => Self::check_vector(sensors.gyro()).map(|v| snapshot.gyr = v),
                    SensorClass::Accel => Self::check_vector(sensors.accel()).map(|v| snapshot.acc = v),
                    SensorClass::Mag => Self::check_vector(sensors.mag()).map(|v| snapshot.mag = v),
                    SensorClass::Velocity => {
                        Self::check_vector(sensors.gps_velocity()).map(|v| snapshot.vel = v)
                    }
                    SensorClass::Baro => {
                        utils::check_scalar(sensors.baro_altitude()).map(|v| snapshot.bar = v)
                    }
                    SensorClass::Airspeed => {
                        Self::check_airspeed(&sensors.airspeed()).map(|v| snapshot.ias = v)
                    }
                    SensorClass::Position => self
                        .check_position(&sensors.gps_position(), home)
                        .map(|v| snapshot.pos = v),
                }
            };

            match result {
                Ok(()) => outcome.snapshot.mark_valid(class.bit()),
                Err(reason) => {
                    est_debug!("dropped {} update: {}", class.name(), reason);
                    outcome.rejected.set(class.bit());
                    // One entry per class at most, capacity is the class count
                    outcome.rejections.push(Rejection { class, reason }).ok();
                }
            }
        }

        outcome
    }

    /// Three-axis well-formedness check
    pub fn check_vector(sample: [f32; 3]) -> SanityResult<[f32; 3]> {
        utils::check_vector(sample)
    }

    /// Airspeed must be finite and the sensor connected
    pub fn check_airspeed(sample: &AirspeedSample) -> SanityResult<f32> {
        let ias = utils::check_scalar(sample.calibrated)?;
        if !sample.connected {
            return Err(SanityError::SensorDisconnected);
        }
        Ok(ias)
    }

    /// Full position check followed by NED conversion
    ///
    /// The converted offset is checked like any other vector sample.
    pub fn check_position(&self, fix: &GpsPosition, home: &HomeLinearizer) -> SanityResult<[f32; 3]> {
        if !utils::all_finite_f64(&[fix.latitude, fix.longitude])
            || !utils::all_finite(&[fix.altitude, fix.geoid_separation])
        {
            return Err(SanityError::MalformedValue);
        }
        if !home.is_configured() {
            return Err(SanityError::HomeNotConfigured);
        }
        if utils::near_zero(fix.latitude, self.null_fix_epsilon_deg)
            && utils::near_zero(fix.longitude, self.null_fix_epsilon_deg)
        {
            return Err(SanityError::NullFix);
        }
        utils::check_range(fix.latitude, -LATITUDE_LIMIT_DEG, LATITUDE_LIMIT_DEG)?;
        utils::check_range(fix.longitude, -LONGITUDE_LIMIT_DEG, LONGITUDE_LIMIT_DEG)?;

        // Finite inputs can still land outside f32 once scaled
        let ned = home.convert_to_ned(fix)?;
        utils::check_vector(ned)
    }
}

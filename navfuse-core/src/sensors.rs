//! Sensor Classes, Update Masks and the Per-Run Snapshot
//!
//! ## Overview
//!
//! Every sensor that feeds the estimator belongs to one of seven classes.
//! Each class owns one bit in a [`SensorMask`]; the same mask type is used
//! for three jobs:
//!
//! - the process-wide "fresh sample waiting" set kept by the update tracker
//! - the validity set of a [`SensorSnapshot`] during one run
//! - the accepted/rejected summaries in run reports
//!
//! Filter units may also set bits for fields they derive (see
//! [`SensorMask::ATTITUDE`]), so the mask has room beyond the sensor bits.
//!
//! ## Memory Model
//!
//! ```text
//! SensorSnapshot (stack, one per run):
//! ├── gyr, acc, mag, pos, vel: 5 × [f32; 3]  = 60 bytes
//! ├── bar, ias:                2 × f32       =  8 bytes
//! ├── att:                     [f32; 4]      = 16 bytes
//! └── updated:                 SensorMask    =  2 bytes (+ padding)
//! ```
//!
//! The snapshot is created fresh each run, handed to the filter chain by
//! mutable reference and dropped when the run ends.

/// Sensor class enumeration
///
/// The discriminant is the bit position in a [`SensorMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorClass {
    /// Rate gyroscope
    Gyro = 0,
    /// Accelerometer
    Accel = 1,
    /// Magnetometer
    Mag = 2,
    /// GPS position (converted to NED)
    Position = 3,
    /// GPS velocity (NED)
    Velocity = 4,
    /// Barometric altitude
    Baro = 5,
    /// Calibrated airspeed
    Airspeed = 6,
}

impl SensorClass {
    /// All classes in bit order
    pub const ALL: [SensorClass; 7] = [
        SensorClass::Gyro,
        SensorClass::Accel,
        SensorClass::Mag,
        SensorClass::Position,
        SensorClass::Velocity,
        SensorClass::Baro,
        SensorClass::Airspeed,
    ];

    /// Mask with only this class's bit set
    pub const fn bit(self) -> SensorMask {
        SensorMask(1 << self as u16)
    }

    /// Index into per-class arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            SensorClass::Gyro => "gyro",
            SensorClass::Accel => "accel",
            SensorClass::Mag => "mag",
            SensorClass::Position => "position",
            SensorClass::Velocity => "velocity",
            SensorClass::Baro => "baro",
            SensorClass::Airspeed => "airspeed",
        }
    }
}

/// Bit set over sensor classes and derived fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorMask(u16);

impl SensorMask {
    /// Gyroscope sample
    pub const GYRO: Self = SensorClass::Gyro.bit();
    /// Accelerometer sample
    pub const ACCEL: Self = SensorClass::Accel.bit();
    /// Magnetometer sample
    pub const MAG: Self = SensorClass::Mag.bit();
    /// NED position
    pub const POSITION: Self = SensorClass::Position.bit();
    /// NED velocity
    pub const VELOCITY: Self = SensorClass::Velocity.bit();
    /// Barometric altitude
    pub const BARO: Self = SensorClass::Baro.bit();
    /// Calibrated airspeed
    pub const AIRSPEED: Self = SensorClass::Airspeed.bit();
    /// Attitude quaternion produced by a filter unit
    pub const ATTITUDE: Self = Self(1 << 8);

    /// Every raw sensor bit
    pub const SENSORS: Self = Self(0b0111_1111);

    /// Empty mask
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// True when no bit is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True when the class's bit is set
    pub const fn has(&self, class: SensorClass) -> bool {
        self.contains(class.bit())
    }

    /// Set the bits of `other`
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`
    pub fn clear(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Bits set in both masks
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Bits set in `self` but not in `other`
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Number of set bits
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Sensor classes whose bit is set, in bit order
    pub fn classes(self) -> impl Iterator<Item = SensorClass> {
        SensorClass::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl core::ops::BitOr for SensorMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for SensorMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<SensorClass> for SensorMask {
    fn from(class: SensorClass) -> Self {
        class.bit()
    }
}

/// Airspeed sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AirspeedSample {
    /// Calibrated airspeed (m/s)
    pub calibrated: f32,
    /// Sensor reports itself connected
    pub connected: bool,
}

/// State shared by the filter units during one run
///
/// Only fields whose bit is set in `updated` hold data from this run; the
/// others keep their zero initialisation and must not be read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSnapshot {
    /// Angular rate (deg/s), body frame
    pub gyr: [f32; 3],
    /// Specific force (m/s²), body frame
    pub acc: [f32; 3],
    /// Magnetic field, body frame
    pub mag: [f32; 3],
    /// Position relative to home (m), NED
    pub pos: [f32; 3],
    /// Velocity (m/s), NED
    pub vel: [f32; 3],
    /// Barometric altitude (m)
    pub bar: f32,
    /// Calibrated airspeed (m/s)
    pub ias: f32,
    /// Attitude quaternion, written by filter units
    pub att: [f32; 4],
    /// Fields valid in this run
    pub updated: SensorMask,
}

impl SensorSnapshot {
    /// Empty snapshot with nothing valid
    pub const fn new() -> Self {
        Self {
            gyr: [0.0; 3],
            acc: [0.0; 3],
            mag: [0.0; 3],
            pos: [0.0; 3],
            vel: [0.0; 3],
            bar: 0.0,
            ias: 0.0,
            att: [0.0; 4],
            updated: SensorMask::empty(),
        }
    }

    /// True when the field for `mask` is valid in this run
    pub const fn is_valid(&self, mask: SensorMask) -> bool {
        self.updated.contains(mask)
    }

    /// Mark fields valid
    pub fn mark_valid(&mut self, mask: SensorMask) {
        self.updated.set(mask);
    }

    /// Mark fields invalid
    pub fn invalidate(&mut self, mask: SensorMask) {
        self.updated.clear(mask);
    }

    /// Vector field of a three-axis class, if any
    pub fn vector(&self, class: SensorClass) -> Option<&[f32; 3]> {
        match class {
            SensorClass::Gyro => Some(&self.gyr),
            SensorClass::Accel => Some(&self.acc),
            SensorClass::Mag => Some(&self.mag),
            SensorClass::Position => Some(&self.pos),
            SensorClass::Velocity => Some(&self.vel),
            SensorClass::Baro | SensorClass::Airspeed => None,
        }
    }
}

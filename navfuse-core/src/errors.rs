//! Error Types for the Estimation Core
//!
//! ## Design Philosophy
//!
//! The estimator runs inside the flight-control loop, so its error system
//! follows the same rules as the rest of the run path:
//!
//! 1. **Small Size**: variants carry a few scalars or a `&'static str`, never
//!    heap data, so errors can be stored in reports without allocation.
//!
//! 2. **Copy Semantics**: every error is `Copy` and can be recorded in
//!    several places (run report, statistics, log) at once.
//!
//! 3. **Never Fatal in the Run Path**: sanity and filter errors describe
//!    what was dropped from one run. The run itself always completes.
//!
//! ## Error Categories
//!
//! ### Sample Rejected (`SanityError`)
//! - `MalformedValue`: a scalar was NaN or infinite
//! - `SensorDisconnected`: the sensor reported itself offline (airspeed)
//! - `HomeNotConfigured`: position arrived before a sane home location
//! - `NullFix`: GPS reported the all-zero fix of an uninitialized receiver
//! - `OutOfRange`: a coordinate outside its geodetic domain
//!
//! ### Filter Unit Failure (`FilterError`)
//! Attributable to a single unit for a single run. The chain keeps going.
//!
//! ### API Misuse (`EstimationError`)
//! Returned by set-up operations only (`start`, chain assembly, settings
//! validation). Never produced while the scheduler is running.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use navfuse_core::{SanityError, SanityGate};
//!
//! match SanityGate::check_vector([0.1, f32::NAN, 0.3]) {
//!     Ok(_) => unreachable!(),
//!     Err(SanityError::MalformedValue) => {
//!         // Drop this sensor class for the current run only
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for sanity checks
pub type SanityResult<T> = Result<T, SanityError>;

/// Result type for filter unit operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Result type for set-up and configuration operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Reasons a sensor sample is rejected for the current run
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SanityError {
    /// At least one scalar is NaN or infinite
    #[error("Invalid value: not a finite number")]
    MalformedValue,

    /// Sensor reported itself disconnected
    #[error("Sensor not connected")]
    SensorDisconnected,

    /// No sane home location has been accepted yet
    #[error("Home location not configured")]
    HomeNotConfigured,

    /// GPS fix is the zeroed fix of an uninitialized receiver
    #[error("Null GPS fix")]
    NullFix,

    /// Coordinate outside its geodetic domain
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Offending value
        value: f64,
        /// Lower bound of the domain
        min: f64,
        /// Upper bound of the domain
        max: f64,
    },
}

/// Failure reported by a filter unit
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FilterError {
    /// Unit was updated before a successful `init`
    #[error("Filter unit not initialized")]
    NotInitialized,

    /// Inputs the unit needs were not valid in this run
    #[error("Required input missing")]
    MissingInput,

    /// Internal state left its numeric envelope
    #[error("Filter diverged: {reason}")]
    Diverged {
        /// Short description of the divergence
        reason: &'static str,
    },

    /// Any other unit-internal failure
    #[error("Filter failure: {reason}")]
    Internal {
        /// Short description of the failure
        reason: &'static str,
    },
}

/// Set-up and configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EstimationError {
    /// Operation not allowed in the scheduler's current state
    #[error("Invalid scheduler state: expected {expected}, found {actual}")]
    InvalidState {
        /// State the operation requires
        expected: &'static str,
        /// State the scheduler was in
        actual: &'static str,
    },

    /// More filter units than the chain can hold
    #[error("Filter chain full: capacity {capacity}")]
    TooManyFilters {
        /// Maximum number of units
        capacity: usize,
    },

    /// The filter factory has no constructor for a configured unit
    #[error("No constructor for filter unit {name}")]
    UnknownFilter {
        /// Name of the requested unit
        name: &'static str,
    },

    /// Settings failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

#[cfg(feature = "defmt")]
impl defmt::Format for SanityError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MalformedValue => defmt::write!(fmt, "Invalid value"),
            Self::SensorDisconnected => defmt::write!(fmt, "Sensor not connected"),
            Self::HomeNotConfigured => defmt::write!(fmt, "Home not configured"),
            Self::NullFix => defmt::write!(fmt, "Null GPS fix"),
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Value {} outside [{}, {}]", value, min, max),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FilterError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotInitialized => defmt::write!(fmt, "Not initialized"),
            Self::MissingInput => defmt::write!(fmt, "Missing input"),
            Self::Diverged { reason } => defmt::write!(fmt, "Diverged: {}", reason),
            Self::Internal { reason } => defmt::write!(fmt, "Internal: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EstimationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidState { expected, actual } =>
                defmt::write!(fmt, "Expected state {}, found {}", expected, actual),
            Self::TooManyFilters { capacity } =>
                defmt::write!(fmt, "Chain full ({})", capacity),
            Self::UnknownFilter { name } => defmt::write!(fmt, "Unknown filter {}", name),
            Self::InvalidConfig(reason) => defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

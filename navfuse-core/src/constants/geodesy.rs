//! Geodetic Constants
//!
//! Values used by the home linearizer and the position sanity check.

/// WGS-84 equatorial radius (meters).
///
/// The tangent-plane conversion scales angular deltas by this radius plus
/// the home altitude.
///
/// Source: NIMA TR8350.2 (WGS-84 definition)
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6.378137e6;

/// Down-axis scale of the tangent-plane conversion.
///
/// Altitude grows upward while the NED down axis grows downward.
pub const NED_DOWN_SCALE: f64 = -1.0;

/// Latitude limit (degrees).
pub const LATITUDE_LIMIT_DEG: f64 = 90.0;

/// Longitude limit (degrees).
pub const LONGITUDE_LIMIT_DEG: f64 = 180.0;

/// Tolerance for recognising the zeroed fix of an uninitialized receiver (degrees).
///
/// One least significant bit of a receiver reporting in 1e-7 degree units.
/// Anything closer to zero than this on both latitude and longitude is
/// treated as "no fix".
pub const NULL_FIX_EPSILON_DEG: f64 = 1.0e-7;

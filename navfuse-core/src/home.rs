//! Home Location Linearization
//!
//! ## Overview
//!
//! GPS reports geodetic latitude/longitude/altitude; the filters want
//! metres North-East-Down relative to home. Over the tens of kilometres a
//! flight covers, a first-order expansion around the home coordinate is
//! accurate enough and costs three multiplications per fix:
//!
//! ```text
//! ΔL = [ rad(lat - lat₀), rad(wrap(lon - lon₀)), alt + N - alt₀ ]
//!
//! NED = [ (alt₀ + R)            · ΔL₀
//!         cos(lat₀)·(alt₀ + R)  · ΔL₁
//!         -1                    · ΔL₂ ]
//! ```
//!
//! where `R` is the WGS-84 equatorial radius and `N` the geoid separation
//! reported by the receiver (GPS altitude is above mean sea level, home
//! altitude above the ellipsoid). The longitude delta is wrapped into
//! [-180°, 180°] and the altitude sum is formed in `f64`.
//!
//! ## Reference Lifecycle
//!
//! The three coefficients are recomputed only when a home-location change
//! passes every check. A rejected update leaves the previous reference in
//! place; stale-but-valid is preferred over undefined. Until the first
//! accepted update there is no reference and every position sample is
//! rejected.
//!
//! ## Accuracy and Limitations
//!
//! - Error grows with distance from home (spherical, first-order model)
//! - No re-linearization in flight; moving home mid-flight shifts the
//!   position frame and the filters see a step

use crate::{
    constants::geodesy::{
        EARTH_EQUATORIAL_RADIUS_M, LATITUDE_LIMIT_DEG, LONGITUDE_LIMIT_DEG, NED_DOWN_SCALE,
    },
    errors::{SanityError, SanityResult},
    sanity::utils,
};

/// Home location as published by the settings collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomeLocation {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Altitude above the WGS-84 ellipsoid (m)
    pub altitude: f32,
    /// Local Earth magnetic field, NED
    pub magnetic_field: [f32; 3],
    /// The operator (or the first fix) has set this location
    pub set: bool,
}

/// Geodetic GPS fix
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsPosition {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Altitude above mean sea level (m)
    pub altitude: f32,
    /// Geoid height above the ellipsoid (m)
    pub geoid_separation: f32,
}

/// Accepted home location with its linearization coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeReference {
    home: HomeLocation,
    lla_to_ned: [f64; 3],
}

impl HomeReference {
    /// Validate `home` and derive the coefficients
    ///
    /// Every scalar must be finite, the coordinate must lie in its domain
    /// and the location must be marked as set.
    pub fn from_home(home: &HomeLocation) -> SanityResult<Self> {
        if !home.set {
            return Err(SanityError::HomeNotConfigured);
        }
        if !utils::all_finite_f64(&[home.latitude, home.longitude])
            || !home.altitude.is_finite()
            || !utils::all_finite(&home.magnetic_field)
        {
            return Err(SanityError::MalformedValue);
        }
        utils::check_range(home.latitude, -LATITUDE_LIMIT_DEG, LATITUDE_LIMIT_DEG)?;
        utils::check_range(home.longitude, -LONGITUDE_LIMIT_DEG, LONGITUDE_LIMIT_DEG)?;

        let lat = home.latitude.to_radians();
        let radius = home.altitude as f64 + EARTH_EQUATORIAL_RADIUS_M;

        Ok(Self {
            home: *home,
            lla_to_ned: [radius, libm::cos(lat) * radius, NED_DOWN_SCALE],
        })
    }

    /// The location these coefficients were derived from
    pub fn home(&self) -> &HomeLocation {
        &self.home
    }

    /// Local magnetic field reference, NED
    pub fn magnetic_field(&self) -> [f32; 3] {
        self.home.magnetic_field
    }

    /// North, east and down scale factors
    pub fn coefficients(&self) -> [f64; 3] {
        self.lla_to_ned
    }

    /// Tangent-plane offset of `position` from home (m)
    ///
    /// No validation; callers gate the fix first.
    pub fn ned_offset(&self, position: &GpsPosition) -> [f32; 3] {
        // Shortest way round, so fixes across the antimeridian stay close
        let dlon = libm::remainder(position.longitude - self.home.longitude, 360.0);
        let delta = [
            (position.latitude - self.home.latitude).to_radians(),
            dlon.to_radians(),
            position.altitude as f64 + position.geoid_separation as f64 - self.home.altitude as f64,
        ];

        [
            (self.lla_to_ned[0] * delta[0]) as f32,
            (self.lla_to_ned[1] * delta[1]) as f32,
            (self.lla_to_ned[2] * delta[2]) as f32,
        ]
    }
}

/// Owner of the current home reference
#[derive(Debug, Clone, Default)]
pub struct HomeLinearizer {
    reference: Option<HomeReference>,
    accepted: u32,
    rejected: u32,
}

impl HomeLinearizer {
    /// Linearizer with no reference yet
    pub const fn new() -> Self {
        Self {
            reference: None,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Handle a home-location change notification
    ///
    /// Replaces the reference wholesale when `home` is sane, otherwise keeps
    /// the previous one untouched.
    pub fn on_home_location_changed(&mut self, home: &HomeLocation) -> SanityResult<&HomeReference> {
        match HomeReference::from_home(home) {
            Ok(reference) => {
                self.accepted = self.accepted.saturating_add(1);
                est_info!(
                    "home location accepted: lat {} lon {} alt {}",
                    home.latitude,
                    home.longitude,
                    home.altitude
                );
                Ok(self.reference.insert(reference))
            }
            Err(e) => {
                self.rejected = self.rejected.saturating_add(1);
                est_warn!("home location rejected ({}), keeping previous reference", e);
                Err(e)
            }
        }
    }

    /// Current reference, if any update has been accepted
    pub fn reference(&self) -> Option<&HomeReference> {
        self.reference.as_ref()
    }

    /// True once a sane home location has been accepted
    pub fn is_configured(&self) -> bool {
        self.reference.is_some()
    }

    /// Convert a GPS fix to NED metres relative to home
    pub fn convert_to_ned(&self, position: &GpsPosition) -> SanityResult<[f32; 3]> {
        self.reference
            .as_ref()
            .map(|r| r.ned_offset(position))
            .ok_or(SanityError::HomeNotConfigured)
    }

    /// Number of accepted and rejected updates
    pub fn update_counts(&self) -> (u32, u32) {
        (self.accepted, self.rejected)
    }
}

//! Geodetic scenarios: home locations and fixes around them

use navfuse_core::{GpsPosition, HomeLocation};

/// Mean Earth radius used for great-circle reference distances (m)
const MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Home on the 45th parallel at sea level
pub fn mid_latitude_home() -> HomeLocation {
    HomeLocation {
        latitude: 45.0,
        longitude: 0.0,
        altitude: 0.0,
        magnetic_field: [22_000.0, 0.0, 42_000.0],
        set: true,
    }
}

/// Home at an airfield near Zurich
pub fn zurich_home() -> HomeLocation {
    HomeLocation {
        latitude: 47.3977,
        longitude: 8.5456,
        altitude: 488.0,
        magnetic_field: [21_300.0, 1_500.0, 43_000.0],
        set: true,
    }
}

/// Fix `dlat`/`dlon` degrees from `home` at home altitude, zero geoid
pub fn fix_offset_from(home: &HomeLocation, dlat: f64, dlon: f64) -> GpsPosition {
    GpsPosition {
        latitude: home.latitude + dlat,
        longitude: home.longitude + dlon,
        altitude: home.altitude,
        geoid_separation: 0.0,
    }
}

/// Fix reported by a receiver that has not acquired yet
pub fn null_fix() -> GpsPosition {
    GpsPosition::default()
}

/// Haversine distance between two coordinates (m)
pub fn great_circle_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (p1, p2) = (lat1.to_radians(), lat2.to_radians());
    let dp = p2 - p1;
    let dl = (lon2 - lon1).to_radians();
    let a = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
    2.0 * MEAN_RADIUS_M * a.sqrt().asin()
}

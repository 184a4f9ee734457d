//! Coordinates, great-circle distance, walking time, and bounding boxes.
//!
//! The bounding box is only ever a prefilter: callers must follow it with an
//! exact [`haversine_m`] pass because degrees are not isotropic in metres.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fixed walking pace used for every walking-time estimate.
pub const WALKING_PACE_M_PER_MIN: f64 = 80.0;

/// Metres spanned by one degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A WGS-84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when `lat` is outside
    /// `[-90, 90]`, `lng` is outside `[-180, 180]`, or either is NaN/infinite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coord = Self { lat, lng };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_m(self, other: Coordinate) -> f64 {
        haversine_m(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Haversine great-circle distance in metres. NaN inputs yield NaN.
#[must_use]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    // Rounding can push `h` just past 1 for antipodal points.
    let h = ((d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2))
        .clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Minutes on foot at [`WALKING_PACE_M_PER_MIN`], rounded up.
///
/// Negative or NaN distances clamp to zero.
#[must_use]
pub fn walking_minutes(meters: f64) -> u32 {
    if meters.is_nan() || meters <= 0.0 {
        return 0;
    }
    // Realistic distances are a few kilometres; the saturating float-to-int
    // cast caps absurd inputs at u32::MAX.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = (meters / WALKING_PACE_M_PER_MIN).ceil() as u32;
    minutes
}

/// Axis-aligned lat/lng rectangle used as a cheap query prefilter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl SearchRegion {
    /// `center ± delta_deg` on both axes. A negative delta is treated as its
    /// absolute value so the region always contains the center.
    #[must_use]
    pub fn around(center: Coordinate, delta_deg: f64) -> Self {
        let delta = delta_deg.abs();
        Self {
            min_lat: center.lat - delta,
            max_lat: center.lat + delta,
            min_lng: center.lng - delta,
            max_lng: center.lng + delta,
        }
    }

    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lng..=self.max_lng).contains(&coord.lng)
    }
}

/// Degree delta wide enough to cover `radius_m` around a point at `lat`.
///
/// Sized for longitude, which shrinks with `cos(lat)`, so the square box
/// always covers the latitude span as well. Clamped near the poles.
#[must_use]
pub fn delta_for_radius(radius_m: f64, lat: f64) -> f64 {
    let cos_lat = lat.to_radians().cos().abs().max(0.01);
    radius_m.abs() / (METERS_PER_DEGREE * cos_lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naha() -> Coordinate {
        Coordinate::new(26.2188, 127.6960).expect("valid coordinate")
    }

    #[test]
    fn antipodal_points_give_half_circumference() {
        let pairs = [
            ((0.0, 0.0), (0.0, 180.0)),
            ((45.0, 10.0), (-45.0, -170.0)),
            ((26.2188, 127.6960), (-26.2188, -52.3040)),
        ];
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        for ((lat1, lng1), (lat2, lng2)) in pairs {
            let d = haversine_m(
                Coordinate::new(lat1, lng1).unwrap(),
                Coordinate::new(lat2, lng2).unwrap(),
            );
            assert!(d.is_finite(), "NaN for ({lat1}, {lng1}) -> ({lat2}, {lng2})");
            assert!((d - half).abs() < 1.0, "got {d}");
        }
    }

    #[test]
    fn new_rejects_out_of_range_latitude() {
        let err = Coordinate::new(91.0, 0.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCoordinate { .. }));
    }

    #[test]
    fn new_rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, -180.5).is_err());
    }

    #[test]
    fn new_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn new_accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_m(naha(), naha()).abs() < 1e-9);
    }

    #[test]
    fn haversine_one_degree_latitude_is_about_111km() {
        let a = Coordinate::new(35.0, 139.0).unwrap();
        let b = Coordinate::new(36.0, 139.0).unwrap();
        let d = haversine_m(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn haversine_tokyo_to_osaka() {
        let tokyo = Coordinate::new(35.6812, 139.7671).unwrap();
        let osaka = Coordinate::new(34.7025, 135.4959).unwrap();
        let d = haversine_m(tokyo, osaka);
        // ~403 km great-circle between the two main stations.
        assert!((d - 403_000.0).abs() < 5_000.0, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let other = Coordinate::new(26.2200, 127.6990).unwrap();
        let ab = haversine_m(naha(), other);
        let ba = haversine_m(other, naha());
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn haversine_propagates_nan() {
        let bad = Coordinate {
            lat: f64::NAN,
            lng: 0.0,
        };
        assert!(haversine_m(bad, naha()).is_nan());
    }

    #[test]
    fn walking_minutes_rounds_up() {
        assert_eq!(walking_minutes(350.0), 5);
        assert_eq!(walking_minutes(80.0), 1);
        assert_eq!(walking_minutes(81.0), 2);
        assert_eq!(walking_minutes(1.0), 1);
    }

    #[test]
    fn walking_minutes_zero_distance() {
        assert_eq!(walking_minutes(0.0), 0);
        assert_eq!(walking_minutes(-5.0), 0);
        assert_eq!(walking_minutes(f64::NAN), 0);
    }

    #[test]
    fn region_contains_center() {
        for delta in [0.0, 0.003, 0.0045, 0.02, -0.01] {
            let region = SearchRegion::around(naha(), delta);
            assert!(region.min_lat <= naha().lat && naha().lat <= region.max_lat);
            assert!(region.min_lng <= naha().lng && naha().lng <= region.max_lng);
            assert!(region.contains(naha()));
        }
    }

    #[test]
    fn region_bounds_are_center_plus_minus_delta() {
        let region = SearchRegion::around(naha(), 0.0045);
        assert!((region.min_lat - (26.2188 - 0.0045)).abs() < 1e-12);
        assert!((region.max_lng - (127.6960 + 0.0045)).abs() < 1e-12);
    }

    #[test]
    fn region_excludes_far_point() {
        let region = SearchRegion::around(naha(), 0.003);
        let far = Coordinate::new(26.2300, 127.6960).unwrap();
        assert!(!region.contains(far));
    }

    #[test]
    fn delta_for_radius_covers_radius_on_both_axes() {
        let delta = delta_for_radius(300.0, naha().lat);
        let region = SearchRegion::around(naha(), delta);
        // Points exactly 300 m north and east must fall inside the box.
        let north = Coordinate::new(naha().lat + 300.0 / METERS_PER_DEGREE, naha().lng).unwrap();
        let east_deg = 300.0 / (METERS_PER_DEGREE * naha().lat.to_radians().cos());
        let east = Coordinate::new(naha().lat, naha().lng + east_deg * 0.999).unwrap();
        assert!(region.contains(north));
        assert!(region.contains(east));
    }

    #[test]
    fn delta_for_radius_matches_observed_magnitudes() {
        let short = delta_for_radius(300.0, 26.0);
        let long = delta_for_radius(2_000.0, 26.0);
        assert!(short > 0.0025 && short < 0.0035, "got {short}");
        assert!(long > 0.015 && long < 0.025, "got {long}");
    }
}

//! # Geographic Utilities
//!
//! Core geographic computation utilities for GPS track analysis.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`haversine_distance_coords`] | Same, on raw latitude/longitude pairs |
//! | [`total_distance`] | Total length of a GPS track in meters |
//! | [`compute_bounds`] | Bounding box of a GPS track |
//!
//! ## Example
//!
//! ```rust
//! use track_analytics::{GpsPoint, geo_utils};
//!
//! let track = vec![
//!     GpsPoint::new(37.7456, -119.5936), // Half Dome trailhead
//!     GpsPoint::new(37.7462, -119.5920),
//!     GpsPoint::new(37.7471, -119.5911),
//! ];
//!
//! let length = geo_utils::total_distance(&track);
//! assert!(length > 0.0);
//!
//! let bounds = geo_utils::compute_bounds(&track).unwrap();
//! assert_eq!(bounds.min_lat, 37.7456);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! The haversine formula calculates the great-circle distance between two points on a sphere
//! of radius [`EARTH_RADIUS_M`]. Accurate to within 0.3% for most practical applications.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees). Points whose
//! coordinates fail [`GpsPoint::is_valid`] are skipped by the track-level functions.

use geo::{BoundingRect, MultiPoint, Point};

use crate::{Bounds, GpsPoint};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per second to miles per hour.
pub const MPS_TO_MPH: f64 = 2.236_94;

/// Meters per second to kilometers per hour.
pub const MPS_TO_KPH: f64 = 3.6;

pub const METERS_PER_MILE: f64 = 1_609.344;

pub const FEET_PER_METER: f64 = 3.280_84;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance in meters between two latitude/longitude pairs.
///
/// `a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)`, `d = 2R · atan2(√a, √(1−a))`.
///
/// # Example
///
/// ```rust
/// use track_analytics::geo_utils::haversine_distance_coords;
///
/// // San Francisco to Los Angeles
/// let d = haversine_distance_coords(37.7749, -122.4194, 34.0522, -118.2437);
/// assert!(d > 550_000.0 && d < 570_000.0);
/// ```
#[inline]
pub fn haversine_distance_coords(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// # Example
///
/// ```rust
/// use track_analytics::{GpsPoint, geo_utils};
///
/// let p = GpsPoint::new(44.4280, -110.5885);
/// assert_eq!(geo_utils::haversine_distance(&p, &p), 0.0);
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    haversine_distance_coords(p1.latitude, p1.longitude, p2.latitude, p2.longitude)
}

/// Calculate the total length of a GPS track in meters.
///
/// Sums the haversine distance between consecutive valid points. Points with missing
/// or out-of-range coordinates are skipped, and the chain continues from the last
/// valid point to the next one. Empty or single-point tracks return 0.0.
pub fn total_distance(points: &[GpsPoint]) -> f64 {
    let mut valid = points.iter().filter(|p| p.is_valid());
    let Some(mut prev) = valid.next() else {
        return 0.0;
    };

    let mut total = 0.0;
    for curr in valid {
        total += haversine_distance(prev, curr);
        prev = curr;
    }
    total
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a GPS track.
///
/// Only points with valid coordinates contribute. Returns `None` when no point
/// has valid coordinates.
///
/// # Example
///
/// ```rust
/// use track_analytics::{GpsPoint, geo_utils};
///
/// let track = vec![
///     GpsPoint::new(51.5000, -0.1300),
///     GpsPoint::new(f64::NAN, 0.0),
///     GpsPoint::new(51.5100, -0.1200),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, 51.5000);
/// assert_eq!(bounds.max_lng, -0.1200);
///
/// assert!(geo_utils::compute_bounds(&[]).is_none());
/// ```
pub fn compute_bounds(points: &[GpsPoint]) -> Option<Bounds> {
    let multi: MultiPoint<f64> = points
        .iter()
        .filter(|p| p.is_valid())
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect();

    let rect = multi.bounding_rect()?;
    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GpsPoint::new(36.0544, -112.1401);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_sf_to_la() {
        let d = haversine_distance_coords(37.7749, -122.4194, 34.0522, -118.2437);
        assert!((550_000.0..=570_000.0).contains(&d));
    }

    #[test]
    fn test_haversine_agrees_with_geo() {
        // geo uses the IUGG mean radius (6371008.8 m), so allow for the radius ratio
        let london = GpsPoint::new(51.5074, -0.1278);
        let paris = GpsPoint::new(48.8566, 2.3522);
        let ours = haversine_distance(&london, &paris);
        let theirs = Haversine::distance(
            Point::new(london.longitude, london.latitude),
            Point::new(paris.longitude, paris.latitude),
        );
        assert!(approx_eq(ours / theirs, 1.0, 1e-5));
    }

    #[test]
    fn test_total_distance_empty_and_single() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(total_distance(&[GpsPoint::new(40.0, -105.0)]), 0.0);
    }

    #[test]
    fn test_total_distance_matches_pairwise_sum() {
        let track = vec![
            GpsPoint::new(40.0150, -105.2705),
            GpsPoint::new(40.0160, -105.2690),
            GpsPoint::new(40.0172, -105.2681),
            GpsPoint::new(40.0185, -105.2666),
        ];
        let expected: f64 = track
            .windows(2)
            .map(|w| haversine_distance(&w[0], &w[1]))
            .sum();
        assert!(approx_eq(total_distance(&track), expected, 1e-9));
    }

    #[test]
    fn test_total_distance_skips_invalid_without_breaking_chain() {
        let a = GpsPoint::new(40.0150, -105.2705);
        let b = GpsPoint::new(40.0172, -105.2681);
        let track = vec![
            a.clone(),
            GpsPoint::new(f64::NAN, -105.27),
            GpsPoint::new(95.0, -105.27),
            b.clone(),
        ];
        assert!(approx_eq(total_distance(&track), haversine_distance(&a, &b), 1e-9));
    }

    #[test]
    fn test_compute_bounds_ignores_invalid() {
        let track = vec![
            GpsPoint::new(51.50, -0.13),
            GpsPoint::new(f64::NAN, 50.0),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.505, -0.125),
        ];
        let bounds = compute_bounds(&track).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_compute_bounds_none_when_no_valid_points() {
        let track = vec![GpsPoint::new(f64::NAN, f64::NAN)];
        assert!(compute_bounds(&track).is_none());
    }
}

//! # Douglas-Peucker Track Simplification
//!
//! Reduces a recorded track before it is stored or sent over the wire, bounding the
//! maximum perpendicular deviation from the simplified path by a tolerance.
//!
//! Distances are measured in planar (longitude, latitude) degree space, not as a
//! geodesic cross-track distance. At the scale of a single hike or ride the error is
//! negligible; it grows near the poles and over very long tracks.
//!
//! The reduction itself is `geo`'s [`SimplifyIdx`] over a `LineString`; the kept
//! indices map back to the original points so altitude, speed and timestamps survive.

use geo::{Coord, LineString, SimplifyIdx};

use crate::GpsPoint;

/// Default tolerance in degrees (~1.1 m of latitude).
pub const DEFAULT_TOLERANCE: f64 = 0.00001;

/// Simplify a track with the Douglas-Peucker algorithm.
///
/// First and last points are always kept, and the output is never longer than the
/// input. Tracks of two points or fewer, and negative or NaN tolerances, return the
/// input unchanged. A tolerance of exactly 0 still drops points lying on the line.
/// Interior points with invalid coordinates are dropped.
///
/// # Example
/// ```
/// use track_analytics::{simplify, GpsPoint};
///
/// // Points along a straight line collapse to the endpoints
/// let points: Vec<GpsPoint> = (0..10)
///     .map(|i| GpsPoint::new(45.0 + i as f64 * 0.001, -121.0))
///     .collect();
///
/// let simplified = simplify(&points, 0.00001);
/// assert_eq!(simplified.len(), 2);
/// assert_eq!(simplified[0], points[0]);
/// assert_eq!(simplified[1], points[9]);
/// ```
pub fn simplify(points: &[GpsPoint], tolerance: f64) -> Vec<GpsPoint> {
    if points.len() <= 2 || tolerance.is_nan() || tolerance < 0.0 {
        return points.to_vec();
    }

    // geo treats a zero epsilon as "keep everything"
    let epsilon = tolerance.max(f64::MIN_POSITIVE);

    // NaN coordinates would poison the distance search, so only valid points go to geo
    let valid: Vec<usize> = (0..points.len()).filter(|&i| points[i].is_valid()).collect();
    let line: LineString<f64> = valid
        .iter()
        .map(|&i| Coord {
            x: points[i].longitude,
            y: points[i].latitude,
        })
        .collect();

    let mut keep: Vec<usize> = line
        .simplify_idx(&epsilon)
        .into_iter()
        .map(|i| valid[i])
        .collect();

    let last = points.len() - 1;
    if keep.first() != Some(&0) {
        keep.insert(0, 0);
    }
    if keep.last() != Some(&last) {
        keep.push(last);
    }

    keep.into_iter().map(|i| points[i].clone()).collect()
}

/// [`simplify`] with [`DEFAULT_TOLERANCE`].
pub fn simplify_default(points: &[GpsPoint]) -> Vec<GpsPoint> {
    simplify(points, DEFAULT_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize, amplitude: f64) -> Vec<GpsPoint> {
        (0..n)
            .map(|i| {
                let offset = if i % 2 == 0 { 0.0 } else { amplitude };
                GpsPoint::new(48.0 + offset, -120.0 + i as f64 * 0.001)
            })
            .collect()
    }

    #[test]
    fn test_short_inputs_unchanged() {
        assert!(simplify(&[], DEFAULT_TOLERANCE).is_empty());

        let one = vec![GpsPoint::new(45.0, -121.0)];
        assert_eq!(simplify(&one, DEFAULT_TOLERANCE), one);

        let two = vec![GpsPoint::new(45.0, -121.0), GpsPoint::new(45.0, -121.0)];
        assert_eq!(simplify(&two, DEFAULT_TOLERANCE), two);
    }

    #[test]
    fn test_keeps_significant_corner() {
        let points = vec![
            GpsPoint::new(45.000, -121.000),
            GpsPoint::new(45.0005, -121.0005),
            GpsPoint::new(45.001, -121.001),
            GpsPoint::new(45.000, -121.002),
        ];
        let simplified = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(
            simplified,
            vec![points[0].clone(), points[2].clone(), points[3].clone()]
        );
    }

    #[test]
    fn test_zigzag_above_tolerance_kept() {
        let points = zigzag(9, 0.001);
        let simplified = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(simplified.len(), points.len());
    }

    #[test]
    fn test_zigzag_below_tolerance_collapses() {
        let points = zigzag(9, 0.000_001);
        let simplified = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified.first(), points.first());
        assert_eq!(simplified.last(), points.last());
    }

    #[test]
    fn test_endpoints_preserved_with_metadata() {
        let points: Vec<GpsPoint> = (0..50)
            .map(|i| {
                GpsPoint::new(45.0 + (i as f64 * 0.3).sin() * 0.0005, -121.0 + i as f64 * 0.0002)
                    .with_altitude(1000.0 + i as f64)
                    .at(format!("2024-08-01T09:{:02}:00Z", i))
            })
            .collect();

        for tolerance in [0.0, 0.000_01, 0.0001, 0.01] {
            let simplified = simplify(&points, tolerance);
            assert!(simplified.len() <= points.len());
            assert_eq!(simplified.first(), points.first());
            assert_eq!(simplified.last(), points.last());

            // No duplicated junction points, original order preserved
            let times: Vec<&str> = simplified.iter().map(|p| p.recorded_at.as_str()).collect();
            let mut sorted = times.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(times, sorted);
        }
    }

    #[test]
    fn test_invalid_interior_points_dropped() {
        let points = vec![
            GpsPoint::new(45.0, -121.0),
            GpsPoint::new(f64::NAN, f64::NAN),
            GpsPoint::new(45.0, -121.001),
        ];
        assert_eq!(simplify(&points, DEFAULT_TOLERANCE).len(), 2);

        let points = vec![
            GpsPoint::new(45.0, -121.0),
            GpsPoint::new(f64::NAN, -121.0005),
            GpsPoint::new(45.001, -121.001),
            GpsPoint::new(45.0, -121.002),
        ];
        let simplified = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(
            simplified,
            vec![points[0].clone(), points[2].clone(), points[3].clone()]
        );
    }

    #[test]
    fn test_invalid_endpoints_kept() {
        let points = vec![
            GpsPoint::new(f64::NAN, f64::NAN),
            GpsPoint::new(45.0, -121.0),
            GpsPoint::new(45.0, -121.001),
            GpsPoint::new(45.0, -121.002),
        ];
        let simplified = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(simplified.len(), 3);
        assert!(simplified[0].latitude.is_nan());
        assert_eq!(simplified[1], points[1]);
        assert_eq!(simplified[2], points[3]);
    }

    #[test]
    fn test_zero_tolerance_drops_collinear_points() {
        let points: Vec<GpsPoint> = (0..5)
            .map(|i| GpsPoint::new(45.0, -121.0 + i as f64))
            .collect();
        assert_eq!(simplify(&points, 0.0).len(), 2);
    }

    #[test]
    fn test_negative_tolerance_returns_input() {
        let points = zigzag(7, 0.000_001);
        assert_eq!(simplify(&points, -1.0), points);
        assert_eq!(simplify(&points, f64::NAN), points);
    }

    #[test]
    fn test_long_zigzag_keeps_every_vertex() {
        let points = zigzag(2_000, 0.001);
        let simplified = simplify_default(&points);
        assert_eq!(simplified.len(), points.len());
    }
}

//! Track statistics.
//!
//! Pure reducers over a chronological point sequence, and the aggregator that
//! composes them into a [`TrackStatsSnapshot`]. Every function tolerates empty
//! input and points with missing fields; nothing here sorts its input.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::geo_utils::{compute_bounds, total_distance};
use crate::GpsPoint;

/// Elevation gain/loss and range over a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationStats {
    /// Sum of positive altitude deltas (m), rounded to 2 decimals
    pub gain: f64,
    /// Sum of negative altitude deltas as a positive number (m), rounded to 2 decimals
    pub loss: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Device-reported speed statistics (m/s) over moving samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregate statistics over a point sequence.
///
/// Recomputed from scratch on every call to [`compute_stats`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackStatsSnapshot {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub min_elevation_m: Option<f64>,
    pub max_elevation_m: Option<f64>,
    pub avg_speed_mps: f64,
    pub max_speed_mps: f64,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
    pub point_count: u64,
}

impl TrackStatsSnapshot {
    /// Snapshot of a session that has not recorded anything yet.
    pub fn empty() -> Self {
        Self::default()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Walk altitudes in order, accumulating gain and loss.
///
/// Points without a usable altitude are skipped but do not break the chain: the
/// next valid altitude is compared against the last valid one.
///
/// ```
/// use track_analytics::{elevation_stats, GpsPoint};
///
/// let points: Vec<GpsPoint> = [100.0, 150.0, 120.0, 200.0]
///     .iter()
///     .map(|&alt| GpsPoint::new(39.74, -105.51).with_altitude(alt))
///     .collect();
///
/// let stats = elevation_stats(&points);
/// assert_eq!(stats.gain, 130.0);
/// assert_eq!(stats.loss, 30.0);
/// ```
pub fn elevation_stats(points: &[GpsPoint]) -> ElevationStats {
    let mut stats = ElevationStats::default();
    let mut last: Option<f64> = None;
    let mut gain = 0.0;
    let mut loss = 0.0;

    for alt in points.iter().filter_map(GpsPoint::altitude) {
        if let Some(prev) = last {
            let delta = alt - prev;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        } else {
            stats.start = Some(alt);
        }

        stats.min = Some(stats.min.map_or(alt, |m| m.min(alt)));
        stats.max = Some(stats.max.map_or(alt, |m| m.max(alt)));
        last = Some(alt);
    }

    stats.end = last;
    stats.gain = round2(gain);
    stats.loss = round2(loss);
    stats
}

/// Average, minimum and maximum over speeds that are present, finite and `> 0`.
///
/// Zero speeds are pauses and would drag the average down, so they are excluded.
/// All fields are zero when nothing qualifies.
pub fn speed_stats(points: &[GpsPoint]) -> SpeedStats {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = 0.0f64;

    for speed in points.iter().filter_map(GpsPoint::speed).filter(|s| *s > 0.0) {
        count += 1;
        sum += speed;
        min = min.min(speed);
        max = max.max(speed);
    }

    if count == 0 {
        return SpeedStats::default();
    }

    SpeedStats {
        avg: sum / count as f64,
        min,
        max,
    }
}

/// Seconds between the first and last point's timestamps.
///
/// 0 for fewer than two points or when either timestamp does not parse.
pub fn duration_seconds(points: &[GpsPoint]) -> f64 {
    let [first, .., last] = points else {
        return 0.0;
    };

    let (Some(start), Some(end)) = (first.timestamp(), last.timestamp()) else {
        return 0.0;
    };

    span_seconds(start, end)
}

fn span_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds();
    if millis < 0 {
        warn!(
            "Track timestamps run backwards ({} -> {}), reporting zero duration",
            start, end
        );
        return 0.0;
    }
    millis as f64 / 1000.0
}

/// Compute a full statistics snapshot for a point sequence.
///
/// Never fails: an empty sequence gives [`TrackStatsSnapshot::empty`].
///
/// # Example
/// ```
/// use track_analytics::{compute_stats, GpsPoint};
///
/// let stats = compute_stats(&[]);
/// assert_eq!(stats.point_count, 0);
/// assert_eq!(stats.distance_meters, 0.0);
/// assert!(stats.min_lat.is_none());
///
/// let points = vec![
///     GpsPoint::new(44.4605, -110.8281).with_altitude(2240.0).at("2024-06-01T08:00:00Z"),
///     GpsPoint::new(44.4625, -110.8300).with_altitude(2252.0).at("2024-06-01T08:05:00Z"),
/// ];
/// let stats = compute_stats(&points);
/// assert_eq!(stats.point_count, 2);
/// assert_eq!(stats.duration_seconds, 300.0);
/// assert_eq!(stats.elevation_gain_m, 12.0);
/// ```
pub fn compute_stats(points: &[GpsPoint]) -> TrackStatsSnapshot {
    let elevation = elevation_stats(points);
    let speed = speed_stats(points);
    let bounds = compute_bounds(points);

    TrackStatsSnapshot {
        distance_meters: total_distance(points),
        duration_seconds: duration_seconds(points),
        elevation_gain_m: elevation.gain,
        elevation_loss_m: elevation.loss,
        min_elevation_m: elevation.min,
        max_elevation_m: elevation.max,
        avg_speed_mps: speed.avg,
        max_speed_mps: speed.max,
        min_lat: bounds.map(|b| b.min_lat),
        max_lat: bounds.map(|b| b.max_lat),
        min_lng: bounds.map(|b| b.min_lng),
        max_lng: bounds.map(|b| b.max_lng),
        point_count: points.len() as u64,
    }
}

/// Compute snapshots for many independent tracks.
///
/// Uses rayon when the `parallel` feature is enabled. Output order matches input order.
pub fn compute_stats_batch(tracks: &[Vec<GpsPoint>]) -> Vec<TrackStatsSnapshot> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        tracks.par_iter().map(|t| compute_stats(t)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        tracks.iter().map(|t| compute_stats(t)).collect()
    }
}

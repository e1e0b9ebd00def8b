//! Live tracking session.
//!
//! Ties the engine together the way a live tracker uses it: each incoming fix goes
//! through the activity detector and into the point buffer, statistics are
//! recomputed from the buffer on demand, and the buffer is simplified before it is
//! stored or sent.

use log::info;
use serde::{Deserialize, Serialize};

use crate::activity::{
    dominant_activity_with, ActivityDetector, ActivityType, DetectionResult, DetectorConfig,
};
use crate::error::{Result, TrackError};
use crate::geojson::build_geojson;
use crate::simplify::{simplify, DEFAULT_TOLERANCE};
use crate::track_stats::{compute_stats, TrackStatsSnapshot};
use crate::GpsPoint;

/// Configuration for a tracking session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub detector: DetectorConfig,
    /// Douglas-Peucker tolerance in degrees. Default: 0.00001
    pub simplify_tolerance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            simplify_tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Summary of a finished session, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTrack {
    pub stats: TrackStatsSnapshot,
    pub dominant_activity: ActivityType,
    pub simplified: Vec<GpsPoint>,
}

/// State of one in-progress recording. Owned by a single session controller.
///
/// # Example
/// ```
/// use track_analytics::{ActivityType, GpsPoint, TrackingSession};
///
/// let mut session = TrackingSession::new();
/// for i in 0..6 {
///     let fix = GpsPoint::new(40.3428 + i as f64 * 0.0001, -105.6836)
///         .with_speed(1.3)
///         .at(format!("2024-06-15T06:00:{:02}Z", i * 10));
///     session.record(fix);
/// }
///
/// assert_eq!(session.current_activity(), ActivityType::Walking);
/// assert_eq!(session.stats().duration_seconds, 50.0);
///
/// let done = session.finish();
/// assert_eq!(done.dominant_activity, ActivityType::Walking);
/// assert_eq!(done.stats.point_count, 6);
/// ```
#[derive(Debug, Clone)]
pub struct TrackingSession {
    config: SessionConfig,
    detector: ActivityDetector,
    points: Vec<GpsPoint>,
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSession {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            detector: ActivityDetector::new(),
            points: Vec::new(),
        }
    }

    pub fn with_config(config: SessionConfig) -> Result<Self> {
        if !config.simplify_tolerance.is_finite() || config.simplify_tolerance < 0.0 {
            return Err(TrackError::invalid_config(format!(
                "simplify_tolerance must be a non-negative number, got {}",
                config.simplify_tolerance
            )));
        }
        Ok(Self {
            detector: ActivityDetector::with_config(config.detector)?,
            config,
            points: Vec::new(),
        })
    }

    /// Record one fix: classify its speed and buffer it.
    pub fn record(&mut self, point: GpsPoint) -> DetectionResult {
        let result = self.detector.add_speed(point.speed_meters_per_second);
        self.points.push(point);
        result
    }

    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn current_activity(&self) -> ActivityType {
        self.detector.current_activity()
    }

    pub fn detector(&self) -> &ActivityDetector {
        &self.detector
    }

    /// Full statistics snapshot of everything recorded so far.
    pub fn stats(&self) -> TrackStatsSnapshot {
        compute_stats(&self.points)
    }

    /// The buffered track reduced with the session's tolerance.
    pub fn simplified(&self) -> Vec<GpsPoint> {
        simplify(&self.points, self.config.simplify_tolerance)
    }

    /// Simplified track as a GeoJSON `LineString`.
    pub fn geojson(&self) -> Option<::geojson::Geometry> {
        build_geojson(&self.simplified())
    }

    /// Clear recorded points and detector state, keeping the configuration.
    pub fn reset(&mut self) {
        self.points.clear();
        self.detector.reset();
    }

    /// End the session. Stats and the dominant activity use every recorded point.
    pub fn finish(self) -> CompletedTrack {
        let stats = self.stats();
        let dominant_activity =
            dominant_activity_with(&self.points, &self.config.detector.thresholds);
        let simplified = self.simplified();

        info!(
            "Finished track: {} points ({} after simplification), {:.0}m, {}",
            stats.point_count,
            simplified.len(),
            stats.distance_meters,
            dominant_activity
        );

        CompletedTrack {
            stats,
            dominant_activity,
            simplified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(i: usize, speed: f64) -> GpsPoint {
        GpsPoint::new(45.3735 + i as f64 * 0.0002, -121.6959 + i as f64 * 0.0001)
            .with_speed(speed)
            .with_altitude(1800.0 + i as f64)
            .at(format!("2024-07-20T12:{:02}:00Z", i))
    }

    #[test]
    fn test_empty_session() {
        let session = TrackingSession::new();
        assert!(session.is_empty());
        assert_eq!(session.stats(), TrackStatsSnapshot::empty());
        assert!(session.simplified().is_empty());
        assert!(session.geojson().is_none());
        assert_eq!(session.current_activity(), ActivityType::Stationary);

        let done = session.finish();
        assert_eq!(done.dominant_activity, ActivityType::Walking);
        assert_eq!(done.stats.point_count, 0);
    }

    #[test]
    fn test_record_feeds_detector_and_buffer() {
        let mut session = TrackingSession::new();
        let mut last = None;
        for i in 0..5 {
            last = Some(session.record(fix(i, 6.0)));
        }
        let last = last.unwrap();
        assert_eq!(last.activity, ActivityType::Biking);
        assert_eq!(session.len(), 5);
        assert_eq!(session.stats().point_count, 5);
        assert_eq!(session.stats().elevation_gain_m, 4.0);
        assert_eq!(session.stats().duration_seconds, 240.0);
    }

    #[test]
    fn test_point_without_speed_is_still_buffered() {
        let mut session = TrackingSession::new();
        session.record(GpsPoint::new(45.0, -121.0));
        assert_eq!(session.len(), 1);
        assert_eq!(session.detector().average_speed(), 0.0);
    }

    #[test]
    fn test_finish_simplifies_straight_track() {
        let mut session = TrackingSession::new();
        for i in 0..20 {
            session.record(fix(i, 1.2));
        }
        let done = session.finish();
        assert_eq!(done.stats.point_count, 20);
        assert_eq!(done.simplified.len(), 2);
        assert_eq!(done.dominant_activity, ActivityType::Walking);
    }

    #[test]
    fn test_reset_clears_points_and_detector() {
        let mut session = TrackingSession::new();
        for i in 0..5 {
            session.record(fix(i, 15.0));
        }
        assert_eq!(session.current_activity(), ActivityType::Driving);

        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.current_activity(), ActivityType::Stationary);
    }

    #[test]
    fn test_invalid_config() {
        let config = SessionConfig {
            simplify_tolerance: -1.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            TrackingSession::with_config(config),
            Err(TrackError::InvalidConfig { .. })
        ));

        let config = SessionConfig {
            detector: DetectorConfig {
                window_size: 0,
                ..DetectorConfig::default()
            },
            ..SessionConfig::default()
        };
        assert!(TrackingSession::with_config(config).is_err());
    }
}

//! # Track Analytics
//!
//! GPS track analytics for live hike, bike and drive tracking.
//!
//! This library provides:
//! - Live activity detection from a stream of speed samples, with hysteresis
//! - Track statistics: distance, duration, elevation gain/loss, speed, bounding box
//! - Douglas-Peucker simplification before storage and map rendering
//! - GeoJSON output and display formatters
//!
//! GPS feeds are noisy. A point with missing or out-of-range fields is left out of
//! the calculations that need those fields and never aborts processing.
//!
//! ## Features
//!
//! - **`parallel`** - Batch statistics over many tracks with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_analytics::{compute_stats, simplify, ActivityDetector, GpsPoint};
//!
//! let points = vec![
//!     GpsPoint::new(37.7456, -119.5936).with_altitude(1230.0).with_speed(1.3),
//!     GpsPoint::new(37.7462, -119.5920).with_altitude(1262.0).with_speed(1.1),
//!     GpsPoint::new(37.7471, -119.5911).with_altitude(1251.0).with_speed(1.4),
//! ];
//!
//! let mut detector = ActivityDetector::new();
//! for p in &points {
//!     let result = detector.add_speed(p.speed_meters_per_second);
//!     println!("{} ({:.0}% confident)", result.activity, result.confidence * 100.0);
//! }
//!
//! let stats = compute_stats(&points);
//! assert_eq!(stats.elevation_gain_m, 32.0);
//! assert_eq!(stats.elevation_loss_m, 11.0);
//!
//! let reduced = simplify(&points, 0.00001);
//! assert_eq!(reduced.first(), points.first());
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub mod error;
pub use error::TrackError;

pub mod geo_utils;

pub mod activity;
pub use activity::{
    classify_speed, dominant_activity, dominant_activity_with, ActivityDetector, ActivityType,
    DetectionResult, DetectorConfig, SpeedThresholds,
};

pub mod track_stats;
pub use track_stats::{
    compute_stats, compute_stats_batch, duration_seconds, elevation_stats, speed_stats,
    ElevationStats, SpeedStats, TrackStatsSnapshot,
};

pub mod simplify;
pub use simplify::{simplify, simplify_default, DEFAULT_TOLERANCE};

pub mod format;
pub use format::{
    format_distance, format_duration, format_elevation, format_pace, format_speed, UnitSystem,
};

pub mod geojson;
pub use crate::geojson::{build_geojson, to_feature};

pub mod parse;
pub use parse::{parse_points_json, points_to_json};

pub mod session;
pub use session::{CompletedTrack, SessionConfig, TrackingSession};

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TrackAnalyticsRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// One location fix.
///
/// Only latitude and longitude are required to build a point; everything else the
/// device may or may not report. A missing or `null` coordinate in JSON becomes NaN,
/// which makes the point invalid for position-based calculations but is never an error.
///
/// # Example
/// ```
/// use track_analytics::GpsPoint;
///
/// let point = GpsPoint::new(44.4280, -110.5885) // Old Faithful
///     .with_altitude(2240.0)
///     .with_speed(1.2)
///     .at("2024-06-01T08:00:00Z");
/// assert!(point.is_valid());
/// assert!(point.timestamp().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    /// Degrees, [-90, 90]
    #[serde(default = "missing_coordinate", deserialize_with = "nullable_coordinate")]
    pub latitude: f64,
    /// Degrees, [-180, 180]
    #[serde(default = "missing_coordinate", deserialize_with = "nullable_coordinate")]
    pub longitude: f64,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub altitude_meters: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed_meters_per_second: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub heading_degrees: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub accuracy_meters: Option<f64>,
    /// ISO-8601 timestamp, parsed on demand
    #[serde(default, deserialize_with = "lenient_string")]
    pub recorded_at: String,
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// Any JSON value; only numbers and strings are kept.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => Some(n),
        Lenient::Text(_) | Lenient::Other(_) => None,
    })
}

fn nullable_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(f64::NAN))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(text) => text,
        Lenient::Number(_) | Lenient::Other(_) => String::new(),
    })
}

impl GpsPoint {
    /// Create a new GPS point with only a position.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_meters: None,
            speed_meters_per_second: None,
            heading_degrees: None,
            accuracy_meters: None,
            recorded_at: String::new(),
        }
    }

    pub fn with_altitude(self, meters: f64) -> Self {
        Self {
            altitude_meters: Some(meters),
            ..self
        }
    }

    pub fn with_speed(self, meters_per_second: f64) -> Self {
        Self {
            speed_meters_per_second: Some(meters_per_second),
            ..self
        }
    }

    pub fn with_heading(self, degrees: f64) -> Self {
        Self {
            heading_degrees: Some(degrees),
            ..self
        }
    }

    pub fn with_accuracy(self, meters: f64) -> Self {
        Self {
            accuracy_meters: Some(meters),
            ..self
        }
    }

    /// Set the ISO-8601 recording time.
    pub fn at(self, recorded_at: impl Into<String>) -> Self {
        Self {
            recorded_at: recorded_at.into(),
            ..self
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Altitude if present and finite.
    pub fn altitude(&self) -> Option<f64> {
        self.altitude_meters.filter(|a| a.is_finite())
    }

    /// Device speed if present and finite. May be zero or negative.
    pub fn speed(&self) -> Option<f64> {
        self.speed_meters_per_second.filter(|s| s.is_finite())
    }

    /// Parsed recording time, `None` if missing or unparsable.
    ///
    /// Times without an offset (`2024-05-01T10:00:00`) and bare dates are taken as UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let text = self.recorded_at.trim();
        if let Ok(ts) = text.parse::<DateTime<Utc>>() {
            return Some(ts);
        }
        if let Ok(naive) = text.parse::<NaiveDateTime>() {
            return Some(Utc.from_utc_datetime(&naive));
        }
        let date = text.parse::<NaiveDate>().ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }
}

/// Bounding box of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{debug, info};
    use std::sync::Mutex;

    /// Live activity detector for one tracking session.
    ///
    /// Mobile callers hold one instance per session and feed it every fix.
    #[derive(uniffi::Object)]
    pub struct LiveActivityDetector {
        inner: Mutex<ActivityDetector>,
    }

    impl LiveActivityDetector {
        fn detector(&self) -> std::sync::MutexGuard<'_, ActivityDetector> {
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[uniffi::export]
    impl LiveActivityDetector {
        #[uniffi::constructor]
        pub fn new() -> Self {
            init_logging();
            Self {
                inner: Mutex::new(ActivityDetector::new()),
            }
        }

        #[uniffi::constructor]
        pub fn with_config(config: DetectorConfig) -> std::result::Result<Self, TrackError> {
            init_logging();
            Ok(Self {
                inner: Mutex::new(ActivityDetector::with_config(config)?),
            })
        }

        pub fn add_speed(&self, speed_mps: Option<f64>) -> DetectionResult {
            self.detector().add_speed(speed_mps)
        }

        pub fn reset(&self) {
            debug!("[TrackAnalyticsRust] Detector reset");
            self.detector().reset()
        }

        pub fn current_activity(&self) -> ActivityType {
            self.detector().current_activity()
        }

        pub fn average_speed(&self) -> f64 {
            self.detector().average_speed()
        }
    }

    #[uniffi::export]
    pub fn default_detector_config() -> DetectorConfig {
        DetectorConfig::default()
    }

    /// Compute a statistics snapshot for a track.
    #[uniffi::export]
    pub fn ffi_compute_stats(points: Vec<GpsPoint>) -> TrackStatsSnapshot {
        init_logging();
        debug!("[TrackAnalyticsRust] compute_stats called with {} points", points.len());
        compute_stats(&points)
    }

    /// Compute snapshots for many historical tracks.
    #[uniffi::export]
    pub fn ffi_compute_stats_batch(tracks: Vec<Vec<GpsPoint>>) -> Vec<TrackStatsSnapshot> {
        init_logging();
        let start = std::time::Instant::now();
        let results = compute_stats_batch(&tracks);
        info!(
            "[TrackAnalyticsRust] Computed stats for {} tracks in {:?}",
            tracks.len(),
            start.elapsed()
        );
        results
    }

    #[uniffi::export]
    pub fn ffi_simplify(points: Vec<GpsPoint>, tolerance: f64) -> Vec<GpsPoint> {
        init_logging();
        let simplified = simplify(&points, tolerance);
        debug!(
            "[TrackAnalyticsRust] Simplified {} -> {} points",
            points.len(),
            simplified.len()
        );
        simplified
    }

    #[uniffi::export]
    pub fn ffi_dominant_activity(points: Vec<GpsPoint>) -> ActivityType {
        dominant_activity(&points)
    }

    /// GeoJSON LineString as a JSON string, `None` for fewer than two points.
    #[uniffi::export]
    pub fn ffi_build_geojson_string(points: Vec<GpsPoint>) -> Option<String> {
        let geometry = build_geojson(&points)?;
        serde_json::to_string(&geometry).ok()
    }

    #[uniffi::export]
    pub fn ffi_parse_points_json(text: String) -> std::result::Result<Vec<GpsPoint>, TrackError> {
        init_logging();
        parse_points_json(&text)
    }

    #[uniffi::export]
    pub fn ffi_format_distance(meters: Option<f64>, units: UnitSystem) -> String {
        format_distance(meters, units)
    }

    #[uniffi::export]
    pub fn ffi_format_duration(seconds: Option<f64>) -> String {
        format_duration(seconds)
    }

    #[uniffi::export]
    pub fn ffi_format_speed(mps: Option<f64>, units: UnitSystem) -> String {
        format_speed(mps, units)
    }

    #[uniffi::export]
    pub fn ffi_format_elevation(meters: Option<f64>, units: UnitSystem) -> String {
        format_elevation(meters, units)
    }

    #[uniffi::export]
    pub fn ffi_format_pace(mps: Option<f64>, units: UnitSystem) -> String {
        format_pace(mps, units)
    }
}

// ============================================================================
// Tests
// ============================================================================

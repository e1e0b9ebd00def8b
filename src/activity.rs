//! # Activity Detection
//!
//! Classifies the current motion activity of a live tracking session from a stream
//! of speed samples.
//!
//! ## Algorithm
//! 1. Keep a bounded buffer of recent speed samples (trimmed to `window_size` once it
//!    grows past `2 × window_size`)
//! 2. Classify the rolling average into a raw speed bucket
//! 3. Count raw detections per candidate activity and only adopt a candidate once it
//!    has been seen `stability_threshold` times, so GPS jitter or a brief stop at a
//!    light never flips the displayed activity. Counts are cleared only on a switch.
//!
//! The live detector never produces [`ActivityType::Hiking`]: hiking and walking share
//! the same speed bucket. [`dominant_activity`] is a separate, post-hoc classifier over
//! a completed track and the two are deliberately not reconciled.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::geo_utils::{MPS_TO_KPH, MPS_TO_MPH};
use crate::GpsPoint;

/// Motion activity of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum ActivityType {
    Stationary,
    Walking,
    /// Never produced by speed classification; assigned by callers from the dominant activity.
    Hiking,
    Biking,
    Driving,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Stationary => "stationary",
            ActivityType::Walking => "walking",
            ActivityType::Hiking => "hiking",
            ActivityType::Biking => "biking",
            ActivityType::Driving => "driving",
        }
    }

    /// Human-readable label for live tracking UIs.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Stationary => "Stopped",
            ActivityType::Walking => "Walking",
            ActivityType::Hiking => "Hiking",
            ActivityType::Biking => "Biking",
            ActivityType::Driving => "Driving",
        }
    }

    pub fn is_moving(&self) -> bool {
        !matches!(self, ActivityType::Stationary)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Speed Buckets
// =============================================================================

/// Upper bounds (exclusive, m/s) of each speed bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SpeedThresholds {
    /// Below this the session is stationary. Default: 0.5 m/s
    pub stationary_max: f64,
    /// Below this the session is walking. Default: 2.7 m/s (~6 mph)
    pub walking_max: f64,
    /// Below this the session is biking, above it driving. Default: 8.9 m/s (~20 mph)
    pub biking_max: f64,
}

impl Default for SpeedThresholds {
    fn default() -> Self {
        Self {
            stationary_max: 0.5,
            walking_max: 2.7,
            biking_max: 8.9,
        }
    }
}

impl SpeedThresholds {
    /// Classify a speed into its raw bucket.
    ///
    /// Missing, NaN and negative speeds count as 0 (stationary).
    pub fn classify(&self, speed_mps: Option<f64>) -> ActivityType {
        let speed = sanitize_speed(speed_mps);
        if speed < self.stationary_max {
            ActivityType::Stationary
        } else if speed < self.walking_max {
            ActivityType::Walking
        } else if speed < self.biking_max {
            ActivityType::Biking
        } else {
            ActivityType::Driving
        }
    }

    fn validate(&self) -> Result<()> {
        let ordered = self.stationary_max.is_finite()
            && self.walking_max.is_finite()
            && self.biking_max.is_finite()
            && 0.0 <= self.stationary_max
            && self.stationary_max < self.walking_max
            && self.walking_max < self.biking_max;
        if !ordered {
            return Err(TrackError::invalid_config(format!(
                "speed thresholds must be finite and increasing, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Classify a single speed sample with the default thresholds.
///
/// ```
/// use track_analytics::{classify_speed, ActivityType};
///
/// assert_eq!(classify_speed(Some(0.49)), ActivityType::Stationary);
/// assert_eq!(classify_speed(Some(0.51)), ActivityType::Walking);
/// assert_eq!(classify_speed(Some(2.71)), ActivityType::Biking);
/// assert_eq!(classify_speed(Some(8.91)), ActivityType::Driving);
/// assert_eq!(classify_speed(None), ActivityType::Stationary);
/// ```
pub fn classify_speed(speed_mps: Option<f64>) -> ActivityType {
    SpeedThresholds::default().classify(speed_mps)
}

fn sanitize_speed(speed_mps: Option<f64>) -> f64 {
    match speed_mps {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 0.0,
    }
}

// =============================================================================
// Live Detector
// =============================================================================

/// Configuration for the live activity detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct DetectorConfig {
    /// Number of samples in the rolling average. Default: 10
    pub window_size: u32,
    /// Raw detections of a candidate needed before switching to it. Default: 3
    pub stability_threshold: u32,
    /// Speed bucket boundaries
    pub thresholds: SpeedThresholds,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            stability_threshold: 3,
            thresholds: SpeedThresholds::default(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(TrackError::invalid_config("window_size must be at least 1"));
        }
        if self.stability_threshold == 0 {
            return Err(TrackError::invalid_config(
                "stability_threshold must be at least 1",
            ));
        }
        self.thresholds.validate()
    }
}

/// Output of one detector step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct DetectionResult {
    /// Hysteresis-filtered activity to display
    pub activity: ActivityType,
    /// Bucket of the current rolling average, before hysteresis
    pub raw_activity: ActivityType,
    pub avg_speed_mps: f64,
    pub avg_speed_mph: f64,
    pub avg_speed_kph: f64,
    pub is_stable: bool,
    /// 0.0-1.0, reaches 1.0 once the activity has held for `stability_threshold` samples
    pub confidence: f64,
}

const ACTIVITY_COUNT: usize = 5;

/// Stateful, session-scoped activity classifier.
///
/// One instance per tracking session; feed it one speed sample per fix, in
/// chronological order.
///
/// # Example
/// ```
/// use track_analytics::{ActivityDetector, ActivityType};
///
/// let mut detector = ActivityDetector::new();
/// for _ in 0..5 {
///     detector.add_speed(Some(1.5));
/// }
/// assert_eq!(detector.current_activity(), ActivityType::Walking);
///
/// // A single outlier does not flip the activity
/// let result = detector.add_speed(Some(20.0));
/// assert_eq!(result.activity, ActivityType::Walking);
/// ```
#[derive(Debug, Clone)]
pub struct ActivityDetector {
    config: DetectorConfig,
    /// Recent samples; NaN marks a missing sample
    speeds: Vec<f64>,
    current: ActivityType,
    stability_count: u32,
    /// Raw detections per candidate since the last switch, indexed by `ActivityType`
    candidate_counts: [u32; ACTIVITY_COUNT],
}

impl Default for ActivityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityDetector {
    /// Create a detector with the default configuration.
    pub fn new() -> Self {
        Self::build(DetectorConfig::default())
    }

    /// Create a detector with a custom configuration.
    pub fn with_config(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DetectorConfig) -> Self {
        Self {
            speeds: Vec::with_capacity(config.window_size as usize * 2 + 1),
            config,
            current: ActivityType::Stationary,
            stability_count: 0,
            candidate_counts: [0; ACTIVITY_COUNT],
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Feed one speed sample (m/s) and return the updated classification.
    pub fn add_speed(&mut self, speed_mps: Option<f64>) -> DetectionResult {
        self.push_sample(speed_mps);

        let avg = self.average_speed();
        let raw = self.config.thresholds.classify(Some(avg));
        self.step(raw);

        let threshold = self.config.stability_threshold;
        DetectionResult {
            activity: self.current,
            raw_activity: raw,
            avg_speed_mps: avg,
            avg_speed_mph: avg * MPS_TO_MPH,
            avg_speed_kph: avg * MPS_TO_KPH,
            is_stable: self.stability_count >= threshold,
            confidence: (self.stability_count as f64 / threshold as f64).min(1.0),
        }
    }

    fn push_sample(&mut self, speed_mps: Option<f64>) {
        let sample = match speed_mps {
            Some(s) if s.is_nan() => f64::NAN,
            Some(s) if s < 0.0 => 0.0,
            Some(s) => s,
            None => f64::NAN,
        };
        self.speeds.push(sample);

        let window = self.config.window_size as usize;
        if self.speeds.len() > window * 2 {
            let excess = self.speeds.len() - window;
            self.speeds.drain(..excess);
        }
    }

    /// The single hysteresis transition rule.
    ///
    /// Candidate counts only grow between switches: a detection of the current
    /// activity, or of another candidate, leaves them untouched.
    fn step(&mut self, raw: ActivityType) {
        if raw == self.current {
            self.stability_count = self.stability_count.saturating_add(1);
            return;
        }

        let count = &mut self.candidate_counts[raw as usize];
        *count = count.saturating_add(1);
        let seen = *count;

        if seen >= self.config.stability_threshold {
            debug!(
                "Activity changed {} -> {} after {} detections",
                self.current, raw, seen
            );
            self.current = raw;
            self.stability_count = self.config.stability_threshold;
            self.candidate_counts = [0; ACTIVITY_COUNT];
        }
    }

    /// Clear all state: stationary, empty buffer, zero counters.
    pub fn reset(&mut self) {
        self.speeds.clear();
        self.current = ActivityType::Stationary;
        self.stability_count = 0;
        self.candidate_counts = [0; ACTIVITY_COUNT];
    }

    pub fn current_activity(&self) -> ActivityType {
        self.current
    }

    /// Rolling average of the buffered samples, ignoring missing ones. 0 when empty.
    pub fn average_speed(&self) -> f64 {
        let (sum, count) = self
            .speeds
            .iter()
            .filter(|s| s.is_finite())
            .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    pub fn is_stable(&self) -> bool {
        self.stability_count >= self.config.stability_threshold
    }

    /// Number of samples currently buffered.
    pub fn sample_count(&self) -> usize {
        self.speeds.len()
    }
}

// =============================================================================
// Dominant Activity
// =============================================================================

/// Most frequent non-stationary speed bucket across a completed track.
///
/// Stationary points are pauses and carry no information. Ties go to the bucket
/// seen first in the track. Defaults to [`ActivityType::Walking`] when there are no
/// moving samples.
///
/// ```
/// use track_analytics::{dominant_activity, ActivityType, GpsPoint};
///
/// let points: Vec<GpsPoint> = [0.0, 1.2, 1.4, 5.0, 0.1]
///     .iter()
///     .map(|&s| GpsPoint::new(46.85, -121.76).with_speed(s))
///     .collect();
/// assert_eq!(dominant_activity(&points), ActivityType::Walking);
/// ```
pub fn dominant_activity(points: &[GpsPoint]) -> ActivityType {
    dominant_activity_with(points, &SpeedThresholds::default())
}

/// [`dominant_activity`] with custom bucket thresholds.
pub fn dominant_activity_with(points: &[GpsPoint], thresholds: &SpeedThresholds) -> ActivityType {
    // (activity, count) in order of first appearance
    let mut counts: Vec<(ActivityType, usize)> = Vec::with_capacity(3);

    for p in points {
        let activity = thresholds.classify(p.speed_meters_per_second);
        if !activity.is_moving() {
            continue;
        }
        match counts.iter_mut().find(|(a, _)| *a == activity) {
            Some((_, count)) => *count += 1,
            None => counts.push((activity, 1)),
        }
    }

    let mut best: Option<(ActivityType, usize)> = None;
    for (activity, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((activity, count));
        }
    }

    best.map(|(a, _)| a).unwrap_or(ActivityType::Walking)
}

// =============================================================================
// Tests
// =============================================================================

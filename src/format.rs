//! Display formatting for live stats and track summaries.
//!
//! All formatters accept `Option<f64>` and return a sentinel string (`"--"`, or
//! `"--:--"` for pace) for missing or unusable values instead of failing.

use serde::{Deserialize, Serialize};

use crate::geo_utils::{FEET_PER_METER, METERS_PER_MILE, MPS_TO_KPH, MPS_TO_MPH};

const MISSING: &str = "--";
const MISSING_PACE: &str = "--:--";

/// Paces slower than this (seconds per km/mi) are not worth displaying.
const MAX_PACE_SECONDS: f64 = 100.0 * 60.0;

/// Unit system for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// `"850 m"` / `"1.23 km"`, or `"528 ft"` / `"1.23 mi"`.
///
/// ```
/// use track_analytics::{format_distance, UnitSystem};
///
/// assert_eq!(format_distance(Some(1234.0), UnitSystem::Metric), "1.23 km");
/// assert_eq!(format_distance(None, UnitSystem::Metric), "--");
/// ```
pub fn format_distance(meters: Option<f64>, units: UnitSystem) -> String {
    let Some(meters) = usable(meters) else {
        return MISSING.to_string();
    };

    match units {
        UnitSystem::Metric if meters < 1000.0 => format!("{:.0} m", meters),
        UnitSystem::Metric => format!("{:.2} km", meters / 1000.0),
        UnitSystem::Imperial => {
            let miles = meters / METERS_PER_MILE;
            if miles < 0.1 {
                format!("{:.0} ft", meters * FEET_PER_METER)
            } else {
                format!("{:.2} mi", miles)
            }
        }
    }
}

/// `"45s"`, `"5m 03s"`, `"1h 05m"`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = usable(seconds) else {
        return MISSING.to_string();
    };

    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// `"12.3 km/h"` / `"7.6 mph"`.
pub fn format_speed(mps: Option<f64>, units: UnitSystem) -> String {
    let Some(mps) = usable(mps) else {
        return MISSING.to_string();
    };

    match units {
        UnitSystem::Metric => format!("{:.1} km/h", mps * MPS_TO_KPH),
        UnitSystem::Imperial => format!("{:.1} mph", mps * MPS_TO_MPH),
    }
}

/// `"123 m"` / `"404 ft"`. Negative elevations (below sea level) are valid.
pub fn format_elevation(meters: Option<f64>, units: UnitSystem) -> String {
    let Some(meters) = meters.filter(|m| m.is_finite()) else {
        return MISSING.to_string();
    };

    match units {
        UnitSystem::Metric => format!("{:.0} m", meters),
        UnitSystem::Imperial => format!("{:.0} ft", meters * FEET_PER_METER),
    }
}

/// Pace per kilometer or mile, `"5:30 /km"` / `"8:51 /mi"`.
///
/// Zero speed has no pace and yields `"--:--"`.
pub fn format_pace(mps: Option<f64>, units: UnitSystem) -> String {
    let Some(mps) = usable(mps).filter(|s| *s > 0.0) else {
        return MISSING_PACE.to_string();
    };

    let (unit_meters, suffix) = match units {
        UnitSystem::Metric => (1000.0, "/km"),
        UnitSystem::Imperial => (METERS_PER_MILE, "/mi"),
    };

    let pace = unit_meters / mps;
    if pace >= MAX_PACE_SECONDS {
        return MISSING_PACE.to_string();
    }

    let total = pace.round() as u64;
    format!("{}:{:02} {}", total / 60, total % 60, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_metric() {
        assert_eq!(format_distance(Some(0.0), UnitSystem::Metric), "0 m");
        assert_eq!(format_distance(Some(850.4), UnitSystem::Metric), "850 m");
        assert_eq!(format_distance(Some(1234.0), UnitSystem::Metric), "1.23 km");
    }

    #[test]
    fn test_format_distance_imperial() {
        assert_eq!(format_distance(Some(50.0), UnitSystem::Imperial), "164 ft");
        assert_eq!(format_distance(Some(METERS_PER_MILE), UnitSystem::Imperial), "1.00 mi");
    }

    #[test]
    fn test_format_distance_sentinels() {
        assert_eq!(format_distance(None, UnitSystem::Metric), "--");
        assert_eq!(format_distance(Some(f64::NAN), UnitSystem::Imperial), "--");
        assert_eq!(format_distance(Some(-3.0), UnitSystem::Metric), "--");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(0.0)), "0s");
        assert_eq!(format_duration(Some(45.2)), "45s");
        assert_eq!(format_duration(Some(303.0)), "5m 03s");
        assert_eq!(format_duration(Some(3900.0)), "1h 05m");
        assert_eq!(format_duration(None), "--");
        assert_eq!(format_duration(Some(f64::INFINITY)), "--");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(Some(10.0), UnitSystem::Metric), "36.0 km/h");
        assert_eq!(format_speed(Some(10.0), UnitSystem::Imperial), "22.4 mph");
        assert_eq!(format_speed(Some(0.0), UnitSystem::Metric), "0.0 km/h");
        assert_eq!(format_speed(None, UnitSystem::Metric), "--");
    }

    #[test]
    fn test_format_elevation() {
        assert_eq!(format_elevation(Some(123.4), UnitSystem::Metric), "123 m");
        assert_eq!(format_elevation(Some(123.0), UnitSystem::Imperial), "404 ft");
        assert_eq!(format_elevation(Some(-86.0), UnitSystem::Metric), "-86 m");
        assert_eq!(format_elevation(None, UnitSystem::Metric), "--");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(Some(1000.0 / 300.0), UnitSystem::Metric), "5:00 /km");
        assert_eq!(format_pace(Some(1000.0 / 330.0), UnitSystem::Metric), "5:30 /km");
        assert_eq!(format_pace(Some(METERS_PER_MILE / 531.0), UnitSystem::Imperial), "8:51 /mi");
        assert_eq!(format_pace(Some(0.0), UnitSystem::Metric), "--:--");
        assert_eq!(format_pace(Some(0.01), UnitSystem::Metric), "--:--");
        assert_eq!(format_pace(None, UnitSystem::Imperial), "--:--");
    }
}

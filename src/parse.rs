//! JSON ingestion of point sequences.
//!
//! Individual points are parsed leniently: missing, `null` or wrongly typed fields
//! are absent values, never errors, so a point with one bad field still counts for
//! every calculation that does not need that field. Only elements that are not JSON
//! objects are skipped. The only failure is a document that is not a point
//! sequence at all.

use log::{debug, warn};
use serde_json::Value;

use crate::error::{Result, TrackError};
use crate::GpsPoint;

/// Parse a JSON array of points (camelCase fields, as sent by clients).
///
/// # Errors
///
/// * [`TrackError::Parse`] if the text is not valid JSON
/// * [`TrackError::InvalidInput`] if the document is not an array
///
/// # Example
/// ```
/// use track_analytics::parse_points_json;
///
/// let points = parse_points_json(r#"[
///     {"latitude": 48.7596, "longitude": -113.787, "altitudeMeters": 2025.0,
///      "recordedAt": "2024-09-01T15:00:00Z"},
///     {"latitude": 48.7601, "longitude": -113.786, "speedMetersPerSecond": null}
/// ]"#).unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[0].altitude_meters, Some(2025.0));
/// assert_eq!(points[1].speed_meters_per_second, None);
///
/// assert!(parse_points_json(r#"{"latitude": 1.0}"#).is_err());
/// ```
pub fn parse_points_json(text: &str) -> Result<Vec<GpsPoint>> {
    let document: Value = serde_json::from_str(text)?;

    let elements = match document {
        Value::Array(elements) => elements,
        other => {
            return Err(TrackError::invalid_input(format!(
                "expected an array of points, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = elements.len();
    let points: Vec<GpsPoint> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| {
            if !element.is_object() {
                warn!(
                    "Skipping point at index {}: {} is not an object",
                    i,
                    json_kind(&element)
                );
                return None;
            }
            match serde_json::from_value::<GpsPoint>(element) {
                Ok(point) => Some(point),
                Err(e) => {
                    warn!("Skipping unreadable point at index {}: {}", i, e);
                    None
                }
            }
        })
        .collect();

    debug!("Parsed {} of {} points", points.len(), total);
    Ok(points)
}

/// Serialize points to the JSON wire format.
pub fn points_to_json(points: &[GpsPoint]) -> Result<String> {
    Ok(serde_json::to_string(points)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

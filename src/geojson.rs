//! GeoJSON output for map rendering.
//!
//! GeoJSON positions are `[longitude, latitude, altitude?]`, the reverse of the
//! latitude-first order used everywhere else in this crate.

use ::geojson::{Feature, Geometry, JsonObject, Value};

use crate::GpsPoint;

/// Build a `LineString` geometry from a track. `None` for fewer than two points.
///
/// Every input point produces one position; altitude is included only when the
/// point has one.
///
/// ```
/// use track_analytics::{build_geojson, GpsPoint};
///
/// let points = vec![
///     GpsPoint::new(36.0544, -112.1401).with_altitude(2100.0),
///     GpsPoint::new(36.0560, -112.1390),
/// ];
/// let geometry = build_geojson(&points).unwrap();
/// let json = serde_json::to_value(&geometry).unwrap();
/// assert_eq!(json["type"], "LineString");
/// assert_eq!(json["coordinates"][0], serde_json::json!([-112.1401, 36.0544, 2100.0]));
/// assert_eq!(json["coordinates"][1], serde_json::json!([-112.1390, 36.0560]));
///
/// assert!(build_geojson(&points[..1]).is_none());
/// ```
pub fn build_geojson(points: &[GpsPoint]) -> Option<Geometry> {
    if points.len() < 2 {
        return None;
    }

    let positions = points
        .iter()
        .map(|p| match p.altitude() {
            Some(alt) => vec![p.longitude, p.latitude, alt],
            None => vec![p.longitude, p.latitude],
        })
        .collect();

    Some(Geometry::new(Value::LineString(positions)))
}

/// Wrap a geometry in a GeoJSON `Feature` with the given properties.
pub fn to_feature(geometry: &Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry.clone()),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

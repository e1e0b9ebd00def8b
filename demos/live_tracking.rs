//! Simulated live tracking session: a short hike with a stop, then a drive home.
//!
//! Run with: cargo run --example live_tracking

use track_analytics::{
    build_geojson, format_distance, format_duration, format_elevation, format_pace, format_speed,
    GpsPoint, TrackingSession, UnitSystem,
};

fn main() {
    let mut session = TrackingSession::new();

    // (speed m/s, number of fixes)
    let legs = [(1.3, 12), (0.1, 4), (1.2, 8), (14.0, 10)];

    let mut i = 0usize;
    for (speed, count) in legs {
        for _ in 0..count {
            let fix = GpsPoint::new(
                37.7456 + i as f64 * 0.0001 * speed,
                -119.5936 + (i as f64 * 0.3).sin() * 0.0002,
            )
            .with_altitude(1230.0 + (i as f64 * 0.2).sin() * 15.0)
            .with_speed(speed)
            .at(format!("2024-06-15T06:{:02}:{:02}Z", i / 6, (i % 6) * 10));

            let result = session.record(fix);
            println!(
                "fix {:2}: {:10} raw={:10} avg={} confidence={:.2}{}",
                i,
                result.activity.label(),
                result.raw_activity.label(),
                format_speed(Some(result.avg_speed_mps), UnitSystem::Metric),
                result.confidence,
                if result.is_stable { "" } else { " (settling)" },
            );
            i += 1;
        }
    }

    let stats = session.stats();
    println!("\nLive stats after {} fixes:", stats.point_count);
    println!("  Distance:  {}", format_distance(Some(stats.distance_meters), UnitSystem::Metric));
    println!("  Duration:  {}", format_duration(Some(stats.duration_seconds)));
    println!(
        "  Gain:      {}",
        format_elevation(Some(stats.elevation_gain_m), UnitSystem::Imperial)
    );
    println!("  Avg pace:  {}", format_pace(Some(stats.avg_speed_mps), UnitSystem::Metric));

    let done = session.finish();
    println!(
        "\nFinished: dominant activity {}, {} points stored",
        done.dominant_activity,
        done.simplified.len()
    );

    if let Some(geometry) = build_geojson(&done.simplified) {
        match serde_json::to_string(&geometry) {
            Ok(json) => println!("GeoJSON: {} bytes", json.len()),
            Err(e) => eprintln!("GeoJSON serialization failed: {}", e),
        }
    }
}

//! Recompute statistics for many historical tracks in parallel.
//!
//! Run with: cargo run --example batch_stats --features parallel

use std::time::Instant;

use track_analytics::{compute_stats_batch, GpsPoint};

fn main() {
    let tracks: Vec<Vec<GpsPoint>> = (0..500)
        .map(|t| {
            (0..2_000)
                .map(|i| {
                    GpsPoint::new(
                        45.0 + t as f64 * 0.01 + i as f64 * 0.00005,
                        -121.0 + (i as f64 * 0.05).sin() * 0.001,
                    )
                    .with_altitude(800.0 + (i as f64 * 0.01).sin() * 120.0)
                    .with_speed(1.0 + (i % 7) as f64 * 0.2)
                })
                .collect()
        })
        .collect();

    let start = Instant::now();
    let results = compute_stats_batch(&tracks);
    let elapsed = start.elapsed();

    let total_km: f64 = results.iter().map(|s| s.distance_meters).sum::<f64>() / 1000.0;
    let total_gain: f64 = results.iter().map(|s| s.elevation_gain_m).sum();

    println!("Processed {} tracks in {:?}", results.len(), elapsed);
    println!("Total distance: {:.1} km, total gain: {:.0} m", total_km, total_gain);
}

//! Performance bounds for map generation
//!
//! The bounds are generous upper limits, not targets.

use cairn::{generate_base_map, CairnResult, GeneratorConfig};
use std::time::{Duration, Instant};

fn time_generation(seed: &str, width: i32, height: i32, density: f64) -> CairnResult<Duration> {
    let config = GeneratorConfig {
        room_density: density,
        ..GeneratorConfig::new(width, height)
    };
    let start = Instant::now();
    let map = generate_base_map(seed, &config)?;
    let elapsed = start.elapsed();

    println!(
        "{}x{} at density {}: {} rooms, {} corridors in {:?}",
        width,
        height,
        density,
        map.rooms.len(),
        map.corridors.len(),
        elapsed
    );
    map.check_integrity()?;
    Ok(elapsed)
}

#[test]
fn test_medium_map_generation_performance() -> CairnResult<()> {
    let elapsed = time_generation("perf-medium", 120, 120, 0.35)?;
    assert!(
        elapsed < Duration::from_millis(1500),
        "120x120 generation took {:?}",
        elapsed
    );
    Ok(())
}

#[test]
fn test_large_map_generation_performance() -> CairnResult<()> {
    let elapsed = time_generation("perf-large", 220, 220, 0.45)?;
    assert!(
        elapsed < Duration::from_secs(5),
        "220x220 generation took {:?}",
        elapsed
    );
    Ok(())
}

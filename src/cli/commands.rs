use std::path::Path;

use tracing::{info, warn};

use crate::config::generation::GenerationParams;
use crate::config::simulation::SimulationConfig;
use crate::persistence;
use crate::world::spatial::Viewport;
use crate::world::World;

/// Generate a fresh world from generation parameters and save it as the
/// first snapshot.
pub fn generate(
    params: &GenerationParams,
    sim_config: &SimulationConfig,
    name: &str,
) -> Result<(), String> {
    let world = World::new(params.clone(), name).map_err(|e| e.to_string())?;
    let snapshot_dir = Path::new(&sim_config.snapshot_directory);
    let path = persistence::save_snapshot(&world, snapshot_dir).map_err(|e| e.to_string())?;
    info!(path = %path.display(), seed = params.seed, "world generated");
    println!("World '{}' generated (seed {}): {}", name, params.seed, path.display());
    Ok(())
}

/// Run the simulation: load a world, drive its tick loop at the
/// configured rate, snapshotting periodically, until a shutdown signal
/// arrives.
pub async fn run_simulation(config: &SimulationConfig, world_path: Option<&str>) -> Result<(), String> {
    let snapshot_dir = Path::new(&config.snapshot_directory);
    let mut world = match world_path {
        Some(path) => {
            info!(path, "loading world from explicit snapshot path");
            persistence::load_snapshot(Path::new(path)).map_err(|e| e.to_string())?
        }
        None => {
            info!(dir = %config.snapshot_directory, "loading latest snapshot");
            persistence::load_latest_valid_snapshot(snapshot_dir).map_err(|e| e.to_string())?
        }
    };

    world
        .set_time_speed(&config.initial_time_speed)
        .map_err(|e| e.to_string())?;

    info!(
        tick = world.tick_count,
        entities = world.entities.len(),
        "world loaded"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let tick_interval_ms = (1000.0 / config.tick_rate_hz) as u64;
    let mut ticks_since_snapshot: u32 = 0;
    let viewport = Viewport { x: 0.0, y: 0.0, zoom: 1.0 };

    info!(
        tick_rate_hz = config.tick_rate_hz,
        snapshot_interval = config.snapshot_interval,
        "simulation running"
    );

    loop {
        let tick_start = std::time::Instant::now();

        world.tick(1.0, viewport);

        if world.tick_count % 1000 == 0 {
            info!(
                tick = world.tick_count,
                season = ?world.time_state().season,
                weather = ?world.weather_state().current,
                active_chunks = world.active_chunk_count(),
                "tick milestone"
            );
        }

        ticks_since_snapshot += 1;
        if ticks_since_snapshot >= config.snapshot_interval {
            match persistence::save_snapshot(&world, snapshot_dir) {
                Ok(path) => {
                    ticks_since_snapshot = 0;
                    info!(path = %path.display(), "snapshot saved");
                    if let Err(e) = persistence::prune_snapshots(snapshot_dir, config.max_snapshots as usize) {
                        warn!(error = %e, "snapshot pruning failed");
                    }
                }
                Err(e) => warn!(error = %e, "snapshot save failed"),
            }
        }

        let elapsed = tick_start.elapsed();
        let target = std::time::Duration::from_millis(tick_interval_ms);
        if elapsed < target {
            tokio::select! {
                _ = tokio::time::sleep(target - elapsed) => {}
                _ = &mut shutdown => {
                    info!("shutdown signal received");
                    break;
                }
            }
        } else {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown signal received");
                    break;
                }
                else => {}
            }
        }
    }

    info!("saving final snapshot");
    match persistence::save_snapshot(&world, snapshot_dir) {
        Ok(path) => info!(path = %path.display(), "final snapshot saved"),
        Err(e) => warn!(error = %e, "final snapshot save failed"),
    }

    info!(tick = world.tick_count, "simulation stopped");
    Ok(())
}

/// Inspect a tile or world summary from the latest snapshot.
pub fn inspect(config: &SimulationConfig, tile: Option<(f64, f64)>, show_world: bool) -> Result<(), String> {
    let snapshot_dir = Path::new(&config.snapshot_directory);
    let world = persistence::load_latest_valid_snapshot(snapshot_dir).map_err(|e| e.to_string())?;

    if let Some((x, y)) = tile {
        inspect_tile(&world, x, y)
    } else if show_world {
        inspect_world(&world);
        Ok(())
    } else {
        Err("Specify --tile <X>,<Y> or --world".to_string())
    }
}

fn inspect_tile(world: &World, x: f64, y: f64) -> Result<(), String> {
    let tile = world
        .get_tile(x, y)
        .ok_or_else(|| format!("tile at ({x}, {y}) is in an inactive chunk"))?;

    println!("=== Tile ({x}, {y}) ===");
    println!("Biome: {:?}", tile.biome);
    println!("Elevation: {:.3}", tile.elevation);
    println!("Moisture: {:.3}", tile.moisture);
    println!("Temperature: {:.3}", tile.temperature);
    println!("Walkable: {}", tile.walkable);
    println!();
    println!("--- Resources ---");
    if tile.resources.is_empty() {
        println!("  (none)");
    } else {
        for r in &tile.resources {
            println!("  {:?}: quality {:.2}, size {:.2}", r.kind, r.quality, r.size);
        }
    }
    println!();
    println!("--- Features ---");
    if tile.features.is_empty() {
        println!("  (none)");
    } else {
        for f in &tile.features {
            println!("  {:?} (shelter: {})", f.kind, f.provides_shelter);
        }
    }

    Ok(())
}

fn inspect_world(world: &World) {
    println!("=== World: {} ===", world.name);
    println!("ID: {}", world.id);
    println!("Tick: {}", world.tick_count);
    println!("Season: {:?} (day {})", world.time_state().season, world.time_state().day);
    println!("Weather: {:?}", world.weather_state().current);
    println!("Entities: {}", world.entities.len());
    println!("Active chunks: {}", world.active_chunk_count());
}

/// List known snapshots, newest first.
pub fn snapshots(config: &SimulationConfig) -> Result<(), String> {
    let snapshot_dir = Path::new(&config.snapshot_directory);
    let list = persistence::list_snapshots(snapshot_dir).map_err(|e| e.to_string())?;
    if list.is_empty() {
        println!("No snapshots found in {}", config.snapshot_directory);
        return Ok(());
    }
    for snap in list {
        println!(
            "tick {:>8}  {} bytes  {}",
            snap.tick_count,
            snap.file_size,
            snap.path.display()
        );
    }
    Ok(())
}

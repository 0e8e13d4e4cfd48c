//! World-scale constants shared across terrain, chunk, time and weather
//! modules. Kept as plain `const`s rather than config fields because they
//! define the coordinate system itself — changing them invalidates any
//! existing snapshot.

pub const CHUNK_SIZE: usize = 32;
pub const TILE_SIZE: f64 = 32.0;
pub const CHUNK_WORLD_SIZE: f64 = CHUNK_SIZE as f64 * TILE_SIZE;

pub const TIME_SCALE: f64 = 60.0;
pub const DAY_LENGTH: f64 = 1440.0;
pub const SEASON_LENGTH_DAYS: u32 = 30;

pub const ELEVATION_NOISE_SCALE: f64 = 100.0;
pub const MOISTURE_NOISE_SCALE: f64 = 150.0;
pub const TEMPERATURE_NOISE_SCALE: f64 = 200.0;
pub const FEATURE_NOISE_SCALE: f64 = 50.0;

/// Chunk-space coordinates: `floor(world_pos / CHUNK_WORLD_SIZE)`.
pub fn world_to_chunk(pos: f64) -> i32 {
    (pos / CHUNK_WORLD_SIZE).floor() as i32
}

/// Tile-local coordinate within a chunk, in `[0, CHUNK_SIZE)`.
pub fn world_to_local_tile(pos: f64) -> usize {
    let tile_in_world = (pos / TILE_SIZE).floor() as i64;
    tile_in_world.rem_euclid(CHUNK_SIZE as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_chunk_floors_toward_negative_infinity() {
        assert_eq!(world_to_chunk(0.0), 0);
        assert_eq!(world_to_chunk(CHUNK_WORLD_SIZE - 0.01), 0);
        assert_eq!(world_to_chunk(CHUNK_WORLD_SIZE), 1);
        assert_eq!(world_to_chunk(-0.01), -1);
    }

    #[test]
    fn local_tile_wraps_within_chunk() {
        assert_eq!(world_to_local_tile(0.0), 0);
        assert_eq!(world_to_local_tile(TILE_SIZE * 31.0), 31);
        assert_eq!(world_to_local_tile(TILE_SIZE * 32.0), 0);
        assert_eq!(world_to_local_tile(-TILE_SIZE), 31);
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use crate::world::constants::*;
use crate::world::noise::NoiseField;
use crate::world::tile::{Biome, Feature, FeatureKind, ResourceDeposit, ResourceKind, Tile};

/// The output of generating one chunk: a full tile grid plus the resource
/// deposits it seeded, addressable by local tile index.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub tiles: Vec<Tile>,
}

impl ChunkData {
    pub fn tile_at(&self, local_x: usize, local_y: usize) -> &Tile {
        &self.tiles[local_y * CHUNK_SIZE + local_x]
    }
}

/// Pure, cached, total chunk generator. `generate_chunk` never fails: any
/// sampling anomaly degrades to a neutral tile rather than propagating an
/// error, so the cache is safe to memoize unconditionally.
pub struct TerrainGenerator {
    noise: NoiseField,
    resource_density: f64,
    cache: Mutex<HashMap<(i32, i32), ChunkData>>,
}

impl TerrainGenerator {
    pub fn new(seed: u64, resource_density: f64) -> Self {
        TerrainGenerator {
            noise: NoiseField::new(seed),
            resource_density: resource_density.clamp(0.0, 1.0),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Generate (or fetch from cache) the chunk at `(chunk_x, chunk_y)`.
    /// Idempotent: repeated calls for the same coordinate return
    /// bit-identical tile data.
    pub fn generate_chunk(&self, chunk_x: i32, chunk_y: i32) -> ChunkData {
        if let Some(cached) = self.cache.lock().unwrap().get(&(chunk_x, chunk_y)) {
            return cached.clone();
        }
        let data = self.generate_chunk_uncached(chunk_x, chunk_y);
        self.cache
            .lock()
            .unwrap()
            .insert((chunk_x, chunk_y), data.clone());
        data
    }

    fn generate_chunk_uncached(&self, chunk_x: i32, chunk_y: i32) -> ChunkData {
        let origin_x = chunk_x as f64 * CHUNK_WORLD_SIZE;
        let origin_y = chunk_y as f64 * CHUNK_WORLD_SIZE;

        let mut tiles = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for ty in 0..CHUNK_SIZE {
            for tx in 0..CHUNK_SIZE {
                let wx = origin_x + tx as f64 * TILE_SIZE;
                let wy = origin_y + ty as f64 * TILE_SIZE;
                tiles.push(self.generate_tile(wx, wy));
            }
        }
        ChunkData { tiles }
    }

    fn generate_tile(&self, wx: f64, wy: f64) -> Tile {
        let wx = if wx.is_finite() { wx } else { 0.0 };
        let wy = if wy.is_finite() { wy } else { 0.0 };

        let e_raw = self.noise.elevation(wx / ELEVATION_NOISE_SCALE, wy / ELEVATION_NOISE_SCALE);
        let e_detail = self
            .noise
            .elevation(2.0 * wx / ELEVATION_NOISE_SCALE, 2.0 * wy / ELEVATION_NOISE_SCALE);
        let elevation = (0.8 * e_raw + 0.2 * e_detail.abs()).clamp(0.0, 1.0);

        let m_raw = self.noise.moisture(wx / MOISTURE_NOISE_SCALE, wy / MOISTURE_NOISE_SCALE);
        let moisture = (0.7 * m_raw + 0.3).clamp(0.0, 1.0);

        let t_raw = self
            .noise
            .temperature(wx / TEMPERATURE_NOISE_SCALE, wy / TEMPERATURE_NOISE_SCALE);
        let latitude_factor = latitude_warmth(wy);
        let temperature = (0.6 * t_raw + 0.4 * latitude_factor).clamp(0.0, 1.0);

        let feature = self.noise.feature(wx / FEATURE_NOISE_SCALE, wy / FEATURE_NOISE_SCALE);
        let combined = (0.8 * elevation + 0.2 * feature).clamp(0.0, 1.0);

        let biome = classify_biome(combined, moisture, temperature);
        let walkable = biome.is_walkable();

        let resources = place_resources(biome, elevation, moisture, temperature, feature, self.resource_density);
        let features = place_features(biome, feature);

        Tile {
            biome,
            elevation,
            moisture,
            temperature,
            walkable,
            resources,
            features,
        }
    }
}

/// Latitude-driven warmth factor in `[0,1]`: 1.0 at the equator, 0.0 at the
/// world's vertical extremes. The "equator" is an abstraction over world
/// y — there's no bounded world height, so it's anchored to a fixed
/// reference band rather than dividing by a world height the generator
/// doesn't otherwise know about.
fn latitude_warmth(world_y: f64) -> f64 {
    const HALF_BAND: f64 = 16_000.0; // ~500 chunks either side of the equator
    let equator_y = 0.0;
    (1.0 - (world_y - equator_y).abs() / HALF_BAND).clamp(0.0, 1.0)
}

fn classify_biome(elevation: f64, moisture: f64, temperature: f64) -> Biome {
    if elevation < 0.2 {
        return Biome::DeepOcean;
    }
    if elevation < 0.4 {
        return Biome::Ocean;
    }
    if elevation < 0.45 {
        return Biome::Beach;
    }

    let cold = temperature < 0.4;
    let mild = temperature < 0.6;
    let warm = temperature < 0.8;
    let dry = moisture < 0.4;
    let wet = moisture >= 0.8;

    if elevation < 0.6 {
        // Lowland
        if cold {
            return if dry { Biome::Tundra } else { Biome::SnowyPlains };
        }
        if mild {
            return if dry {
                Biome::Plains
            } else if wet {
                Biome::Rainforest
            } else {
                Biome::Forest
            };
        }
        // warm or hot share the same bucketing
        let _ = warm;
        return if dry {
            Biome::Desert
        } else if wet {
            Biome::Jungle
        } else {
            Biome::Savanna
        };
    }

    if elevation < 0.8 {
        // Highland
        return if cold {
            Biome::SnowyMountains
        } else if moisture >= 0.5 {
            Biome::ForestHills
        } else {
            Biome::Hills
        };
    }

    // Peaks
    if cold {
        Biome::SnowyPeaks
    } else {
        Biome::Mountains
    }
}

/// Per-resource-type environmental scaling applied to placement chance:
/// wood scales with moisture (trees need water), ore/stone with elevation
/// (exposed rock), berries with temperature (fruit ripens in warmth), fish
/// with moisture (shoreline proximity).
fn environmental_modifier(kind: ResourceKind, elevation: f64, moisture: f64, temperature: f64) -> f64 {
    match kind {
        ResourceKind::Wood => 0.5 + 0.5 * moisture,
        ResourceKind::Ore | ResourceKind::Stone => 0.5 + 0.5 * elevation,
        ResourceKind::Berry => 0.5 + 0.5 * temperature,
        ResourceKind::Fish => 0.5 + 0.5 * moisture,
        ResourceKind::Herb => 0.5 + 0.25 * moisture + 0.25 * temperature,
    }
}

/// Deterministic resource placement, derived purely from the feature noise
/// sample — never a runtime RNG — so the same chunk always seeds the same
/// deposits. Placement chance is a function of `(biome, elevation,
/// moisture, temperature, density)`: `density` sets the baseline, then the
/// resource type's own environmental modifier scales it up or down before
/// the feature-noise roll.
fn place_resources(
    biome: Biome,
    elevation: f64,
    moisture: f64,
    temperature: f64,
    feature_noise: f64,
    density: f64,
) -> Vec<ResourceDeposit> {
    if biome.is_water() || density <= 0.0 {
        return Vec::new();
    }

    let kind = match biome {
        Biome::Forest | Biome::ForestHills | Biome::Rainforest | Biome::Jungle => ResourceKind::Wood,
        Biome::Hills | Biome::Mountains | Biome::SnowyMountains => ResourceKind::Ore,
        Biome::SnowyPeaks => ResourceKind::Stone,
        Biome::Beach => ResourceKind::Fish,
        Biome::Savanna | Biome::Plains | Biome::SnowyPlains | Biome::Tundra => ResourceKind::Berry,
        Biome::Desert => ResourceKind::Stone,
        Biome::DeepOcean | Biome::Ocean => return Vec::new(),
    };

    let modifier = environmental_modifier(kind, elevation, moisture, temperature);
    let spawn_chance = (density * modifier).clamp(0.0, 1.0);
    let threshold = 1.0 - spawn_chance;
    if feature_noise < threshold {
        return Vec::new();
    }

    // Size/quality both derived from the same feature sample, offset so
    // they don't trivially correlate 1:1.
    let size = 0.8 + 0.4 * feature_noise;
    let quality = (0.7 + 0.3 * (1.0 - feature_noise) * (0.5 + 0.5 * moisture)).clamp(0.7, 1.0);

    vec![ResourceDeposit { kind, quality, size }]
}

fn place_features(biome: Biome, feature_noise: f64) -> Vec<Feature> {
    let kind = match biome {
        Biome::Forest | Biome::Rainforest | Biome::Jungle | Biome::ForestHills => FeatureKind::Tree,
        Biome::Hills | Biome::Mountains | Biome::SnowyMountains | Biome::SnowyPeaks => FeatureKind::Rock,
        Biome::Desert => FeatureKind::Cave,
        Biome::Savanna | Biome::Plains | Biome::SnowyPlains | Biome::Tundra => FeatureKind::Bush,
        Biome::Beach => FeatureKind::Ruin,
        Biome::DeepOcean | Biome::Ocean => return Vec::new(),
    };
    if feature_noise < 0.55 {
        return Vec::new();
    }
    let provides_shelter = matches!(kind, FeatureKind::Cave | FeatureKind::Tree);
    vec![Feature { kind, provides_shelter }]
}

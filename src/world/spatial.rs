use std::collections::HashMap;

use crate::entity::{Entity, EntityId};
use crate::world::chunk::Chunk;
use crate::world::constants::{world_to_chunk, CHUNK_WORLD_SIZE};
use crate::world::generation::TerrainGenerator;
use crate::world::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// Owns chunk storage and the rules for creating, activating, and
/// migrating entities between chunks. Entity bodies themselves live in the
/// world's entity map; the spatial index only tracks which chunk each
/// belongs to.
#[derive(Debug)]
pub struct SpatialIndex {
    chunks: HashMap<(i32, i32), Chunk>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        SpatialIndex {
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_coords_for(pos: (f64, f64)) -> (i32, i32) {
        (world_to_chunk(pos.0), world_to_chunk(pos.1))
    }

    pub fn get_or_generate(&mut self, coords: (i32, i32), generator: &TerrainGenerator) -> &mut Chunk {
        self.chunks.entry(coords).or_insert_with(|| {
            let data = generator.generate_chunk(coords.0, coords.1);
            Chunk::from_generated(coords.0, coords.1, data)
        })
    }

    pub fn chunk(&self, coords: (i32, i32)) -> Option<&Chunk> {
        self.chunks.get(&coords)
    }

    pub fn chunk_mut(&mut self, coords: (i32, i32)) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coords)
    }

    pub fn tile_at(&self, pos: (f64, f64)) -> Option<&Tile> {
        let coords = Self::chunk_coords_for(pos);
        let chunk = self.chunks.get(&coords)?;
        let local_x = crate::world::constants::world_to_local_tile(pos.0);
        let local_y = crate::world::constants::world_to_local_tile(pos.1);
        chunk.tile_at(local_x, local_y)
    }

    /// Activates every chunk within `view_distance` of the viewport,
    /// generating missing ones, and deactivates every other currently
    /// active chunk.
    pub fn update_active_chunks(&mut self, viewport: Viewport, view_distance: i32, generator: &TerrainGenerator) {
        let center = (world_to_chunk(viewport.x), world_to_chunk(viewport.y));
        let mut wanted = Vec::new();
        for dx in -view_distance..=view_distance {
            for dy in -view_distance..=view_distance {
                wanted.push((center.0 + dx, center.1 + dy));
            }
        }
        for coords in &wanted {
            self.get_or_generate(*coords, generator).activate();
        }
        let wanted_set: std::collections::HashSet<_> = wanted.into_iter().collect();
        for (coords, chunk) in self.chunks.iter_mut() {
            if chunk.active && !wanted_set.contains(coords) {
                chunk.deactivate();
            }
        }
    }

    pub fn active_chunk_coords(&self) -> Vec<(i32, i32)> {
        self.chunks
            .iter()
            .filter(|(_, c)| c.active)
            .map(|(coords, _)| *coords)
            .collect()
    }

    /// Moves an entity from its previous chunk into the one implied by its
    /// current position, creating the destination on demand. No-op if the
    /// chunk hasn't changed.
    pub fn migrate_if_needed(
        &mut self,
        id: EntityId,
        old_chunk: (i32, i32),
        new_pos: (f64, f64),
        generator: &TerrainGenerator,
    ) -> (i32, i32) {
        let new_chunk = Self::chunk_coords_for(new_pos);
        if new_chunk == old_chunk {
            return old_chunk;
        }
        if let Some(chunk) = self.chunks.get_mut(&old_chunk) {
            chunk.remove_entity(id);
        }
        self.get_or_generate(new_chunk, generator).add_entity(id);
        new_chunk
    }

    pub fn entities_in_range<'a>(
        &self,
        entities: &'a HashMap<EntityId, Entity>,
        x: f64,
        y: f64,
        radius: f64,
        exclude: Option<EntityId>,
    ) -> Vec<&'a Entity> {
        let min_chunk = Self::chunk_coords_for((x - radius, y - radius));
        let max_chunk = Self::chunk_coords_for((x + radius, y + radius));
        let mut found = Vec::new();
        for cx in min_chunk.0..=max_chunk.0 {
            for cy in min_chunk.1..=max_chunk.1 {
                let Some(chunk) = self.chunks.get(&(cx, cy)) else {
                    continue;
                };
                for id in &chunk.entities {
                    if Some(*id) == exclude {
                        continue;
                    }
                    let Some(entity) = entities.get(id) else {
                        continue;
                    };
                    let (ex, ey) = entity.header().pos;
                    let dist_sq = (ex - x).powi(2) + (ey - y).powi(2);
                    if dist_sq <= radius * radius {
                        found.push(entity);
                    }
                }
            }
        }
        found
    }

    #[allow(dead_code)]
    pub(crate) fn chunk_world_size_hint() -> f64 {
        CHUNK_WORLD_SIZE
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityHeader, EntityKind};

    #[test]
    fn get_or_generate_creates_then_reuses_chunk() {
        let generator = TerrainGenerator::new(1, 0.3);
        let mut index = SpatialIndex::new();
        index.get_or_generate((0, 0), &generator);
        assert!(index.chunk((0, 0)).is_some());
    }

    #[test]
    fn update_active_chunks_activates_view_radius_and_deactivates_rest() {
        let generator = TerrainGenerator::new(1, 0.3);
        let mut index = SpatialIndex::new();
        index.update_active_chunks(Viewport { x: 0.0, y: 0.0, zoom: 1.0 }, 1, &generator);
        assert_eq!(index.active_chunk_coords().len(), 9);

        index.update_active_chunks(
            Viewport {
                x: 100_000.0,
                y: 100_000.0,
                zoom: 1.0,
            },
            1,
            &generator,
        );
        assert!(index.chunk((0, 0)).map(|c| !c.active).unwrap_or(true));
    }

    #[test]
    fn migrate_moves_entity_between_chunks() {
        let generator = TerrainGenerator::new(1, 0.3);
        let mut index = SpatialIndex::new();
        let id = EntityId(1);
        index.get_or_generate((0, 0), &generator).add_entity(id);
        let new_chunk = index.migrate_if_needed(id, (0, 0), (CHUNK_WORLD_SIZE + 1.0, 0.0), &generator);
        assert_eq!(new_chunk, (1, 0));
        assert!(!index.chunk((0, 0)).unwrap().entities.contains(&id));
        assert!(index.chunk((1, 0)).unwrap().entities.contains(&id));
    }

    #[test]
    fn migrate_same_chunk_is_noop() {
        let generator = TerrainGenerator::new(1, 0.3);
        let mut index = SpatialIndex::new();
        let id = EntityId(1);
        index.get_or_generate((0, 0), &generator).add_entity(id);
        let chunk = index.migrate_if_needed(id, (0, 0), (5.0, 5.0), &generator);
        assert_eq!(chunk, (0, 0));
    }

    #[test]
    fn entities_in_range_filters_by_distance_and_exclusion() {
        let generator = TerrainGenerator::new(1, 0.3);
        let mut index = SpatialIndex::new();
        let near = EntityId(1);
        let far = EntityId(2);
        index.get_or_generate((0, 0), &generator).add_entity(near);
        index.get_or_generate((0, 0), &generator).add_entity(far);

        let mut entities = HashMap::new();
        entities.insert(
            near,
            Entity::Resource(crate::entity::Resource::new(
                EntityHeader::new(near, EntityKind::Resource, (5.0, 5.0)),
                crate::world::tile::ResourceKind::Berry,
                10.0,
                0.9,
            )),
        );
        entities.insert(
            far,
            Entity::Resource(crate::entity::Resource::new(
                EntityHeader::new(far, EntityKind::Resource, (900.0, 900.0)),
                crate::world::tile::ResourceKind::Berry,
                10.0,
                0.9,
            )),
        );

        let found = index.entities_in_range(&entities, 0.0, 0.0, 20.0, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), near);

        let found_excl = index.entities_in_range(&entities, 5.0, 5.0, 20.0, Some(near));
        assert!(found_excl.is_empty());
    }
}

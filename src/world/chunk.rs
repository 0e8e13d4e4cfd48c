use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::world::constants::CHUNK_SIZE;
use crate::world::generation::ChunkData;
use crate::world::tile::Tile;

/// A `CHUNK_SIZE x CHUNK_SIZE` block of tiles plus the entities currently
/// resident in it. Chunks are created lazily from [`ChunkData`] the first
/// time they're requested and carry an activation flag so the orchestrator
/// can skip ticking chunks nobody is observing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub tiles: Vec<Tile>,
    pub entities: HashSet<EntityId>,
    pub active: bool,
    pub dirty: bool,
}

impl Chunk {
    pub fn from_generated(chunk_x: i32, chunk_y: i32, data: ChunkData) -> Self {
        Chunk {
            chunk_x,
            chunk_y,
            tiles: data.tiles,
            entities: HashSet::new(),
            active: false,
            dirty: false,
        }
    }

    pub fn tile_at(&self, local_x: usize, local_y: usize) -> Option<&Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        self.tiles.get(local_y * CHUNK_SIZE + local_x)
    }

    pub fn tile_at_mut(&mut self, local_x: usize, local_y: usize) -> Option<&mut Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        self.tiles.get_mut(local_y * CHUNK_SIZE + local_x)
    }

    /// Idempotent: adding an entity already present is a no-op and does not
    /// mark the chunk dirty again.
    pub fn add_entity(&mut self, id: EntityId) {
        if self.entities.insert(id) {
            self.dirty = true;
        }
    }

    /// Idempotent: removing an entity not present is a no-op.
    pub fn remove_entity(&mut self, id: EntityId) {
        if self.entities.remove(&id) {
            self.dirty = true;
        }
    }

    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.dirty = true;
        }
    }

    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.dirty = true;
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::TerrainGenerator;

    fn sample_chunk() -> Chunk {
        let gen = TerrainGenerator::new(1, 0.3);
        Chunk::from_generated(0, 0, gen.generate_chunk(0, 0))
    }

    #[test]
    fn tile_at_respects_bounds() {
        let chunk = sample_chunk();
        assert!(chunk.tile_at(0, 0).is_some());
        assert!(chunk.tile_at(CHUNK_SIZE - 1, CHUNK_SIZE - 1).is_some());
        assert!(chunk.tile_at(CHUNK_SIZE, 0).is_none());
    }

    #[test]
    fn adding_entity_twice_is_idempotent() {
        let mut chunk = sample_chunk();
        let id = EntityId(42);
        chunk.add_entity(id);
        chunk.clear_dirty();
        chunk.add_entity(id);
        assert!(!chunk.dirty);
        assert_eq!(chunk.entities.len(), 1);
    }

    #[test]
    fn removing_absent_entity_is_idempotent() {
        let mut chunk = sample_chunk();
        chunk.clear_dirty();
        chunk.remove_entity(EntityId(7));
        assert!(!chunk.dirty);
    }

    #[test]
    fn activate_deactivate_toggle_dirty_once() {
        let mut chunk = sample_chunk();
        chunk.clear_dirty();
        chunk.activate();
        assert!(chunk.active);
        assert!(chunk.dirty);
        chunk.clear_dirty();
        chunk.activate();
        assert!(!chunk.dirty);
    }
}

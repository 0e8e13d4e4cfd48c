pub mod animal;
pub mod human;
pub mod plant;
pub mod resource;

use serde::{Deserialize, Serialize};

pub use animal::Animal;
pub use human::Human;
pub use plant::Plant;
pub use resource::Resource;

/// Entities are identified by a monotonic counter unique within a world,
/// not a UUID — ids are stable across a snapshot round-trip and cheap to
/// compare/hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Hands out the next id for a world. Never reused even after the entity
/// it named is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIdAllocator {
    next: u64,
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        EntityIdAllocator { next: 1 }
    }
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Human,
    Animal,
    Plant,
    Resource,
}

/// Fields every entity kind carries, regardless of variant-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHeader {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: (f64, f64),
    pub last_chunk: (i32, i32),
    pub velocity: (f64, f64),
    pub size: f64,
    pub speed: f64,
    pub vision_range: f64,
    pub interaction_range: f64,
    pub health: f64,
    pub max_health: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub active: bool,
}

impl EntityHeader {
    pub fn new(id: EntityId, kind: EntityKind, pos: (f64, f64)) -> Self {
        EntityHeader {
            id,
            kind,
            pos,
            last_chunk: (
                crate::world::constants::world_to_chunk(pos.0),
                crate::world::constants::world_to_chunk(pos.1),
            ),
            velocity: (0.0, 0.0),
            size: 1.0,
            speed: 1.0,
            vision_range: 100.0,
            interaction_range: 16.0,
            health: 100.0,
            max_health: 100.0,
            energy: 100.0,
            max_energy: 100.0,
            active: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn current_chunk(&self) -> (i32, i32) {
        (
            crate::world::constants::world_to_chunk(self.pos.0),
            crate::world::constants::world_to_chunk(self.pos.1),
        )
    }
}

/// A tagged union over the four entity kinds. Every variant embeds an
/// [`EntityHeader`], so shared bookkeeping (position, health, activation)
/// never has to re-derive the kind via a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Human(Human),
    Animal(Animal),
    Plant(Plant),
    Resource(Resource),
}

impl Entity {
    pub fn header(&self) -> &EntityHeader {
        match self {
            Entity::Human(h) => &h.header,
            Entity::Animal(a) => &a.header,
            Entity::Plant(p) => &p.header,
            Entity::Resource(r) => &r.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut EntityHeader {
        match self {
            Entity::Human(h) => &mut h.header,
            Entity::Animal(a) => &mut a.header,
            Entity::Plant(p) => &mut p.header,
            Entity::Resource(r) => &mut r.header,
        }
    }

    pub fn id(&self) -> EntityId {
        self.header().id
    }

    pub fn view(&self) -> EntityView {
        let h = self.header();
        EntityView {
            id: h.id,
            kind: h.kind,
            pos: h.pos,
            health: h.health,
            max_health: h.max_health,
            energy: h.energy,
            max_energy: h.max_energy,
            active: h.active,
        }
    }
}

/// Unit vector from `from` to `to`, scaled by `speed`. Returns zero rather
/// than normalizing a zero-length vector when the points coincide.
pub fn direction_toward(from: (f64, f64), to: (f64, f64), speed: f64) -> (f64, f64) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < f64::EPSILON {
        (0.0, 0.0)
    } else {
        (dx / dist * speed, dy / dist * speed)
    }
}

/// Read-only external snapshot of an entity, returned by `World::entity_view`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: (f64, f64),
    pub health: f64,
    pub max_health: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_never_repeats() {
        let mut alloc = EntityIdAllocator::default();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(a.0 + 1, b.0);
    }

    #[test]
    fn header_tracks_alive_state() {
        let mut h = EntityHeader::new(EntityId(1), EntityKind::Human, (0.0, 0.0));
        assert!(h.is_alive());
        h.health = 0.0;
        assert!(!h.is_alive());
    }

    #[test]
    fn header_chunk_matches_constants_conversion() {
        let h = EntityHeader::new(EntityId(1), EntityKind::Animal, (100.0, -5.0));
        assert_eq!(h.current_chunk(), h.last_chunk);
    }

    #[test]
    fn direction_toward_points_at_target_with_given_speed() {
        let v = direction_toward((0.0, 0.0), (10.0, 0.0), 2.0);
        assert!((v.0 - 2.0).abs() < 1e-9);
        assert!(v.1.abs() < 1e-9);
    }

    #[test]
    fn direction_toward_same_point_is_zero() {
        let v = direction_toward((5.0, 5.0), (5.0, 5.0), 3.0);
        assert_eq!(v, (0.0, 0.0));
    }
}

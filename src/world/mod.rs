pub mod chunk;
pub mod constants;
pub mod generation;
pub mod noise;
pub mod spatial;
pub mod tile;
pub mod time;
pub mod weather;

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::{Action, ActionKind, ActionScheduler, PrereqError};
use crate::config::generation::GenerationParams;
use crate::entity::{Entity, EntityHeader, EntityId, EntityIdAllocator, EntityKind, EntityView};
use crate::error::SimError;
use crate::thought::{self, ThoughtContext};
use crate::world::generation::TerrainGenerator;
use crate::world::spatial::{SpatialIndex, Viewport};
use crate::world::tile::Tile;
use crate::world::time::{TimeSpeed, TimeState};
use crate::world::weather::{WeatherState, WeatherSystem};

pub use spatial::Viewport as WorldViewport;

/// A world-bounds rectangle used by `query_entities_in_rect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn contains(&self, pos: (f64, f64)) -> bool {
        pos.0 >= self.x_min && pos.0 <= self.x_max && pos.1 >= self.y_min && pos.1 <= self.y_max
    }
}

/// The authoritative simulation state. Serializable in full for snapshots;
/// `spatial`/`terrain` are reconstructed from `generation_params` and the
/// deserialized entity map rather than serialized directly, since chunk
/// content is fully determined by the seed.
#[derive(Debug, Serialize, Deserialize)]
pub struct World {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub tick_count: u64,
    pub generation_params: GenerationParams,
    pub time: TimeState,
    pub weather: WeatherState,
    pub entities: HashMap<EntityId, Entity>,
    pub action_schedulers: HashMap<EntityId, ActionScheduler>,
    pub id_allocator: EntityIdAllocator,

    #[serde(skip, default)]
    pending_additions: Vec<Entity>,
    #[serde(skip, default)]
    pending_removals: HashSet<EntityId>,

    #[serde(skip)]
    terrain: Option<TerrainGenerator>,
    #[serde(skip)]
    weather_rng_seed: u64,
    #[serde(skip, default)]
    spatial: SpatialIndex,
}

impl World {
    pub fn new(generation_params: GenerationParams, name: impl Into<String>) -> Result<Self, SimError> {
        generation_params
            .validate()
            .map_err(SimError::InvalidInput)?;

        let seed = generation_params.seed;
        let resource_density = generation_params.resource_density;
        Ok(World {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now_rfc3339(),
            tick_count: 0,
            generation_params,
            time: TimeState::default(),
            weather: WeatherState::default(),
            entities: HashMap::new(),
            action_schedulers: HashMap::new(),
            id_allocator: EntityIdAllocator::default(),
            pending_additions: Vec::new(),
            pending_removals: HashSet::new(),
            terrain: Some(TerrainGenerator::new(seed, resource_density)),
            weather_rng_seed: seed,
            spatial: SpatialIndex::new(),
        })
    }

    /// Rebuilds transient, non-serialized state (`terrain`, `spatial`,
    /// weather RNG) after a snapshot load. The entity map and chunk
    /// membership are otherwise reconstructed lazily as chunks activate.
    pub fn rehydrate(&mut self) {
        let seed = self.generation_params.seed;
        let density = self.generation_params.resource_density;
        self.terrain = Some(TerrainGenerator::new(seed, density));
        self.weather_rng_seed = seed;
        self.spatial = SpatialIndex::new();
        for entity in self.entities.values() {
            let coords = SpatialIndex::chunk_coords_for(entity.header().pos);
            self.spatial
                .get_or_generate(coords, self.terrain.as_ref().unwrap())
                .add_entity(entity.id());
        }
    }

    pub fn set_time_speed(&mut self, name: &str) -> Result<(), SimError> {
        let speed = TimeSpeed::from_name(name)
            .ok_or_else(|| SimError::InvalidInput(format!("unknown time speed '{name}'")))?;
        self.time.set_speed(speed);
        Ok(())
    }

    pub fn add_entity(&mut self, kind: EntityKind, pos: (f64, f64)) -> EntityId {
        let id = self.id_allocator.allocate();
        let header = EntityHeader::new(id, kind, pos);
        let entity = match kind {
            EntityKind::Human => Entity::Human(crate::entity::Human::new(header)),
            EntityKind::Animal => Entity::Animal(crate::entity::Animal::new(
                header,
                crate::entity::animal::Species::Deer,
                pos,
            )),
            EntityKind::Plant => Entity::Plant(crate::entity::Plant::new(
                header,
                crate::entity::plant::PlantType::Grass,
                0.01,
            )),
            EntityKind::Resource => Entity::Resource(crate::entity::Resource::new(
                header,
                crate::world::tile::ResourceKind::Berry,
                100.0,
                0.8,
            )),
        };
        self.pending_additions.push(entity);
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        self.pending_removals.insert(id);
    }

    pub fn get_tile(&self, x: f64, y: f64) -> Option<&Tile> {
        self.spatial.tile_at((x, y))
    }

    pub fn time_state(&self) -> &TimeState {
        &self.time
    }

    pub fn weather_state(&self) -> &WeatherState {
        &self.weather
    }

    pub fn entity_view(&self, id: EntityId) -> Option<EntityView> {
        self.entities.get(&id).map(Entity::view)
    }

    pub fn query_entities_in_rect(&self, rect: Rect) -> Vec<EntityView> {
        self.entities
            .values()
            .filter(|e| rect.contains(e.header().pos))
            .map(Entity::view)
            .collect()
    }

    pub fn query_entities_near(&self, x: f64, y: f64, radius: f64) -> Vec<EntityView> {
        self.spatial
            .entities_in_range(&self.entities, x, y, radius, None)
            .into_iter()
            .map(Entity::view)
            .collect()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.spatial.active_chunk_coords().len()
    }

    /// The authoritative tick sequence: time, weather, season hook, chunk
    /// activation, entity update, thought processing, effect application,
    /// then draining the pending add/remove queues.
    pub fn tick(&mut self, dt: f64, viewport: Viewport) {
        let previous_season = self.time.season;
        self.time.update(dt);

        let terrain = self.terrain.take().expect("world not rehydrated");
        let mut weather_sys = WeatherSystem::new(self.weather_rng_seed.wrapping_add(self.tick_count));
        weather_sys.state = self.weather;
        weather_sys.update(dt, self.time.season);
        weather_sys.apply_diurnal_phase(self.time.day_progress);
        self.weather = weather_sys.state;

        if self.time.season != previous_season {
            self.fire_seasonal_hook();
        }

        let view_distance = self.generation_params.view_distance_chunks as i32;
        self.spatial.update_active_chunks(viewport, view_distance, &terrain);

        self.update_active_entities(dt, &terrain);
        self.process_thoughts();
        self.execute_actions(dt);
        self.apply_weather_effects(dt);
        self.process_entity_changes(&terrain);

        self.terrain = Some(terrain);
        self.tick_count += 1;
    }

    fn fire_seasonal_hook(&mut self) {
        for entity in self.entities.values_mut() {
            if let Entity::Plant(p) = entity {
                p.seasonal_growth_modifier = match self.time.season {
                    crate::world::time::Season::Spring => 1.3,
                    crate::world::time::Season::Summer => 1.0,
                    crate::world::time::Season::Autumn => 0.6,
                    crate::world::time::Season::Winter => 0.1,
                };
            }
        }
    }

    /// Snapshots the active entities, evaluates each one's per-tick update
    /// independently across rayon's worker pool, then applies the results
    /// and migrates chunk membership back sequentially. Mirrors the
    /// snapshot-evaluate-apply discipline the terrain phases use: workers
    /// never see each other's output, so results are order-independent and
    /// the sequential apply pass is the only place that mutates `self`.
    fn update_active_entities(&mut self, dt: f64, terrain: &TerrainGenerator) {
        let active_ids: Vec<EntityId> = self
            .spatial
            .active_chunk_coords()
            .into_iter()
            .filter_map(|coords| self.spatial.chunk(coords))
            .flat_map(|c| c.entities.iter().copied())
            .collect();

        let elapsed_seconds = self.time.elapsed_seconds;
        let light_level = self.time.light_level();

        let snapshots: Vec<(EntityId, Entity)> = active_ids
            .iter()
            .filter_map(|id| self.entities.get(id).map(|e| (*id, e.clone())))
            .collect();

        let entities_ref = &self.entities;
        let spatial_ref = &self.spatial;
        let updated: Vec<(EntityId, Entity)> = snapshots
            .into_par_iter()
            .map(|(id, mut entity)| {
                entity.header_mut().active = true;
                let pos = entity.header().pos;
                let vision_range = entity.header().vision_range;
                match &mut entity {
                    Entity::Human(h) => {
                        let peers_present = spatial_ref
                            .entities_in_range(entities_ref, pos.0, pos.1, vision_range, Some(id))
                            .iter()
                            .any(|e| matches!(e, Entity::Human(_)));
                        h.decay_needs(dt, peers_present);
                        h.update_stats(dt);
                        h.update_status_effects(dt);
                        h.apply_movement(dt);
                        h.refresh_mood();
                        h.update_relationships(dt);
                        h.check_level_up();
                        h.prune_expired_memory(elapsed_seconds);
                    }
                    Entity::Animal(a) => {
                        let threats_nearby = a.is_prey
                            && spatial_ref
                                .entities_in_range(entities_ref, pos.0, pos.1, vision_range, Some(id))
                                .iter()
                                .any(|e| matches!(e, Entity::Animal(other) if other.is_predator));
                        a.decay_needs(dt);
                        a.assess_threats(threats_nearby);
                        let home_distance = ((a.header.pos.0 - a.home_location.0).powi(2)
                            + (a.header.pos.1 - a.home_location.1).powi(2))
                        .sqrt();
                        let is_preferred_time = matches!(
                            a.preferred_time,
                            crate::entity::animal::PreferredTime::Any
                        ) || (light_level > 0.5)
                            == matches!(a.preferred_time, crate::entity::animal::PreferredTime::Day);
                        a.decide_behavior(threats_nearby, is_preferred_time, home_distance);
                        a.update_velocity();
                        a.apply_movement(dt);
                    }
                    Entity::Plant(p) => p.grow(dt),
                    Entity::Resource(r) => {
                        r.try_regenerate(elapsed_seconds, 600.0, 1.0, dt);
                    }
                }
                (id, entity)
            })
            .collect();

        for (id, mut entity) in updated {
            let pos = entity.header().pos;
            let last_chunk = entity.header().last_chunk;
            let new_chunk = self.spatial.migrate_if_needed(id, last_chunk, pos, terrain);
            entity.header_mut().last_chunk = new_chunk;
            if let Some(slot) = self.entities.get_mut(&id) {
                *slot = entity;
            }
        }
    }

    /// Advances each active human's current action, pulling the next queued
    /// action from its scheduler once the previous one finishes or none is
    /// running. Prerequisites are re-checked at start so a target that died
    /// or wandered out of range between queueing and execution silently
    /// drops the action rather than applying a nonsensical effect.
    fn execute_actions(&mut self, dt: f64) {
        let human_ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Human(_)) && e.header().active)
            .map(|(id, _)| *id)
            .collect();

        for id in human_ids {
            let scheduler = self.action_schedulers.entry(id).or_default();
            scheduler.tick_cooldowns(dt);

            let needs_next = {
                let Some(Entity::Human(h)) = self.entities.get(&id) else {
                    continue;
                };
                h.current_action.is_none()
            };

            if needs_next {
                let next = self.action_schedulers.entry(id).or_default().pop_next();
                if let Some(action) = next {
                    let (actor_pos, interaction_range) = {
                        let Some(Entity::Human(h)) = self.entities.get(&id) else {
                            continue;
                        };
                        (h.header.pos, h.header.interaction_range)
                    };
                    if self
                        .check_prerequisites(actor_pos, interaction_range, &action)
                        .is_ok()
                    {
                        let is_locomotion =
                            matches!(action.kind, ActionKind::Walk | ActionKind::Run | ActionKind::Move);
                        let target_pos = if is_locomotion {
                            action
                                .target
                                .and_then(|target_id| self.entities.get(&target_id))
                                .map(|target| target.header().pos)
                        } else {
                            None
                        };
                        if let Some(Entity::Human(h)) = self.entities.get_mut(&id) {
                            h.header.energy = (h.header.energy - action.kind.energy_cost()).max(0.0);
                            h.action_timer = action.duration.unwrap_or(0.0);
                            if let Some(target_pos) = target_pos {
                                let run_multiplier = if action.kind == ActionKind::Run { 1.5 } else { 1.0 };
                                h.header.velocity = crate::entity::direction_toward(
                                    h.header.pos,
                                    target_pos,
                                    h.header.speed * run_multiplier,
                                );
                            }
                            h.current_action = Some(action);
                        }
                    }
                }
                continue;
            }

            let finished = {
                let Some(Entity::Human(h)) = self.entities.get_mut(&id) else {
                    continue;
                };
                h.action_timer -= dt;
                h.action_timer <= 0.0
            };

            if finished {
                let action = {
                    let Some(Entity::Human(h)) = self.entities.get_mut(&id) else {
                        continue;
                    };
                    h.current_action.take()
                };
                if let Some(action) = action {
                    self.apply_action_completion(id, &action);
                    if let Some(Entity::Human(h)) = self.entities.get_mut(&id) {
                        h.action_timer = 0.0;
                    }
                }
            }
        }
    }

    /// Validates an action's target and reachability before it is allowed
    /// to start. `Walk`/`Run`/`Move` require the actor's own tile be
    /// walkable; interaction-like actions require a living, in-range,
    /// non-depleted target.
    fn check_prerequisites(
        &self,
        actor_pos: (f64, f64),
        interaction_range: f64,
        action: &Action,
    ) -> Result<(), PrereqError> {
        match action.kind {
            ActionKind::Gather | ActionKind::Interact | ActionKind::Craft | ActionKind::Fight => {
                let target_id = action.target.ok_or(PrereqError::TargetMissing)?;
                let target = self
                    .entities
                    .get(&target_id)
                    .ok_or(PrereqError::TargetMissing)?;
                if !target.header().is_alive() {
                    return Err(PrereqError::TargetDead);
                }
                let dx = target.header().pos.0 - actor_pos.0;
                let dy = target.header().pos.1 - actor_pos.1;
                if (dx * dx + dy * dy).sqrt() > interaction_range {
                    return Err(PrereqError::TargetOutOfRange);
                }
                if let Entity::Resource(r) = target {
                    if r.is_depleted {
                        return Err(PrereqError::TargetDepleted);
                    }
                }
                Ok(())
            }
            ActionKind::Walk | ActionKind::Run | ActionKind::Move => {
                if self
                    .spatial
                    .tile_at(actor_pos)
                    .map(|t| t.walkable)
                    .unwrap_or(false)
                {
                    Ok(())
                } else {
                    Err(PrereqError::TileNotWalkable)
                }
            }
            _ => Ok(()),
        }
    }

    /// Applies an action's effect once its duration has elapsed: harvesting
    /// for `Gather`, a relationship nudge for `Interact`, need restoration
    /// for `Rest`/`Sleep`, velocity reset for locomotion. Actions without a
    /// modeled completion effect (`Idle`, `Work`, `Craft`, `Fight`) are
    /// no-ops here — their cost was already charged at start.
    fn apply_action_completion(&mut self, actor: EntityId, action: &Action) {
        match action.kind {
            ActionKind::Gather => {
                let Some(target_id) = action.target else { return };
                let skill_level = match self.entities.get(&actor) {
                    Some(Entity::Human(h)) => h.skills.get("gathering").copied().unwrap_or(0),
                    _ => 0,
                };
                let efficiency = 0.8 + 0.1 * skill_level as f64;
                let weather_modifier = self.weather.gather_modifier();
                let harvested = if let Some(Entity::Resource(r)) = self.entities.get_mut(&target_id) {
                    Some(r.harvest(10.0, efficiency, weather_modifier, self.time.elapsed_seconds))
                } else {
                    None
                };
                if let Some(amount) = harvested {
                    if amount > 0.0 {
                        if let Some(Entity::Human(h)) = self.entities.get_mut(&actor) {
                            h.inventory.push(format!("resource:{}", target_id.0));
                        }
                    }
                }
            }
            ActionKind::Interact => {
                let Some(target_id) = action.target else { return };
                let delta = if action.reason.as_deref() == Some("help") { 10.0 } else { 5.0 };
                if let Some(Entity::Human(h)) = self.entities.get_mut(&actor) {
                    let rel = h
                        .relationships
                        .entry(target_id)
                        .or_insert_with(|| crate::entity::human::Relationship::new(0.5, self.time.elapsed_seconds));
                    rel.apply_delta(delta, self.time.elapsed_seconds);
                }
            }
            ActionKind::Rest | ActionKind::Sleep => {
                if let Some(Entity::Human(h)) = self.entities.get_mut(&actor) {
                    h.needs.energy = 0.0;
                    h.header.energy = h.header.max_energy;
                }
            }
            ActionKind::Walk | ActionKind::Run | ActionKind::Move => {
                let next = action.next_action.as_deref().cloned();
                if let Some(Entity::Human(h)) = self.entities.get_mut(&actor) {
                    h.header.velocity = (0.0, 0.0);
                }
                if let Some(next) = next {
                    self.action_schedulers.entry(actor).or_default().queue_action(next);
                }
            }
            _ => {}
        }
    }

    fn process_thoughts(&mut self) {
        let human_ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Human(_)) && e.header().active)
            .map(|(id, _)| *id)
            .collect();

        for id in human_ids {
            let (needs, personality, stress, pos, vision_range, distance_from_home) = {
                let Some(Entity::Human(h)) = self.entities.get(&id) else {
                    continue;
                };
                let stress = thought::derive_stress(&h.needs, h.personality.neuroticism);
                let pos = h.header.pos;
                let distance_from_home = ((pos.0 - h.home_location.0).powi(2) + (pos.1 - h.home_location.1).powi(2)).sqrt();
                (h.needs, h.personality, stress, pos, h.header.vision_range, distance_from_home)
            };
            let nearby = self.spatial.entities_in_range(&self.entities, pos.0, pos.1, vision_range, Some(id));
            let nearest_peer = nearby.iter()
                .filter(|e| matches!(e, Entity::Human(_)))
                .min_by(|a, b| {
                    let da = (a.header().pos.0 - pos.0).powi(2) + (a.header().pos.1 - pos.1).powi(2);
                    let db = (b.header().pos.0 - pos.0).powi(2) + (b.header().pos.1 - pos.1).powi(2);
                    da.total_cmp(&db)
                })
                .map(|e| e.id());
            let nearest_resource = nearby.iter()
                .filter(|e| matches!(e, Entity::Resource(r) if !r.is_depleted))
                .min_by(|a, b| {
                    let da = (a.header().pos.0 - pos.0).powi(2) + (a.header().pos.1 - pos.1).powi(2);
                    let db = (b.header().pos.0 - pos.0).powi(2) + (b.header().pos.1 - pos.1).powi(2);
                    da.total_cmp(&db)
                })
                .map(|e| e.id());
            let weather_kind = self.weather.current;
            let ctx = ThoughtContext {
                time: &self.time,
                weather: weather_kind,
                needs,
                personality,
                distance_from_home,
                peers_nearby: nearest_peer.is_some(),
                resources_nearby: nearest_resource.is_some(),
                nearest_peer,
                nearest_resource,
                stress,
            };
            let Some(generated) = thought::generate_thought(&ctx) else {
                continue;
            };
            let action = thought::thought_to_action(&generated);
            let scheduler = self.action_schedulers.entry(id).or_default();
            scheduler.queue_action(action);
            if let Some(Entity::Human(h)) = self.entities.get_mut(&id) {
                thought::store_thought(h, &generated);
            }
        }
    }

    fn apply_weather_effects(&mut self, dt: f64) {
        let is_storm = self.weather.current == crate::world::weather::WeatherKind::Storm;
        let is_precipitation = matches!(
            self.weather.current,
            crate::world::weather::WeatherKind::Rain | crate::world::weather::WeatherKind::Storm
        );
        if !is_precipitation {
            return;
        }
        for entity in self.entities.values_mut() {
            if let Entity::Resource(r) = entity {
                let sheltered = self
                    .spatial
                    .tile_at(r.header.pos)
                    .map(|t| t.provides_shelter())
                    .unwrap_or(false);
                if !sheltered {
                    r.apply_weather_damage(0.7, dt, is_storm);
                }
            }
        }
    }

    fn process_entity_changes(&mut self, terrain: &TerrainGenerator) {
        for id in self.pending_removals.drain() {
            if let Some(entity) = self.entities.remove(&id) {
                let coords = entity.header().last_chunk;
                if let Some(chunk) = self.spatial.chunk_mut(coords) {
                    chunk.remove_entity(id);
                }
            }
            self.action_schedulers.remove(&id);
        }

        for entity in self.pending_additions.drain(..) {
            let id = entity.id();
            let coords = SpatialIndex::chunk_coords_for(entity.header().pos);
            self.spatial.get_or_generate(coords, terrain).add_entity(id);
            self.entities.insert(id, entity);
        }
    }
}

fn now_rfc3339() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> World {
        let mut params = GenerationParams::default();
        params.seed = 42;
        params.view_distance_chunks = 1;
        World::new(params, "test-world").unwrap()
    }

    #[test]
    fn new_world_starts_at_tick_zero() {
        let world = test_world();
        assert_eq!(world.tick_count, 0);
    }

    #[test]
    fn tick_advances_time_and_tick_count() {
        let mut world = test_world();
        world.tick(1.0, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
        assert_eq!(world.tick_count, 1);
        assert!(world.time.elapsed_seconds > 0.0);
    }

    #[test]
    fn add_entity_lands_in_world_after_one_tick() {
        let mut world = test_world();
        let id = world.add_entity(EntityKind::Human, (10.0, 10.0));
        assert!(world.entities.get(&id).is_none());
        world.tick(1.0, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
        assert!(world.entities.contains_key(&id));
    }

    #[test]
    fn remove_entity_drains_on_next_tick() {
        let mut world = test_world();
        let id = world.add_entity(EntityKind::Plant, (5.0, 5.0));
        world.tick(1.0, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
        assert!(world.entities.contains_key(&id));
        world.remove_entity(id);
        world.tick(1.0, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
        assert!(!world.entities.contains_key(&id));
    }

    #[test]
    fn invalid_generation_params_rejected() {
        let mut params = GenerationParams::default();
        params.world_width_tiles = 1;
        assert!(World::new(params, "bad").is_err());
    }

    #[test]
    fn set_time_speed_rejects_unknown_name() {
        let mut world = test_world();
        assert!(world.set_time_speed("warp").is_err());
        assert!(world.set_time_speed("fast").is_ok());
    }

    #[test]
    fn query_entities_in_rect_filters_by_bounds() {
        let mut world = test_world();
        let inside = world.add_entity(EntityKind::Resource, (5.0, 5.0));
        let outside = world.add_entity(EntityKind::Resource, (9000.0, 9000.0));
        world.tick(1.0, Viewport { x: 0.0, y: 0.0, zoom: 1.0 });
        let rect = Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 100.0,
            y_max: 100.0,
        };
        let found = world.query_entities_in_rect(rect);
        assert!(found.iter().any(|e| e.id == inside));
        assert!(!found.iter().any(|e| e.id == outside));
    }

    #[test]
    fn queued_gather_action_harvests_target_resource() {
        let mut world = test_world();
        let viewport = Viewport { x: 0.0, y: 0.0, zoom: 1.0 };
        let human_id = world.add_entity(EntityKind::Human, (5.0, 5.0));
        let resource_id = world.add_entity(EntityKind::Resource, (5.0, 5.0));
        world.tick(1.0, viewport);

        let scheduler = world.action_schedulers.entry(human_id).or_default();
        scheduler.queue_action(
            crate::action::Action::new(ActionKind::Gather, 100.0).with_target(resource_id),
        );

        let initial_quantity = match world.entities.get(&resource_id).unwrap() {
            Entity::Resource(r) => r.quantity,
            _ => unreachable!(),
        };

        for _ in 0..10 {
            world.tick(1.0, viewport);
        }

        let remaining = match world.entities.get(&resource_id).unwrap() {
            Entity::Resource(r) => r.quantity,
            _ => unreachable!(),
        };
        assert!(remaining < initial_quantity);
        let Entity::Human(h) = world.entities.get(&human_id).unwrap() else {
            unreachable!()
        };
        assert!(h.inventory.iter().any(|item| item.contains(&resource_id.0.to_string())));
    }

    #[test]
    fn action_with_missing_target_is_dropped_without_starting() {
        let mut world = test_world();
        let viewport = Viewport { x: 0.0, y: 0.0, zoom: 1.0 };
        let human_id = world.add_entity(EntityKind::Human, (5.0, 5.0));
        world.tick(1.0, viewport);

        let scheduler = world.action_schedulers.entry(human_id).or_default();
        scheduler.queue_action(
            crate::action::Action::new(ActionKind::Gather, 100.0).with_target(EntityId(9999)),
        );

        world.tick(1.0, viewport);

        let Entity::Human(h) = world.entities.get(&human_id).unwrap() else {
            unreachable!()
        };
        assert!(h.current_action.is_none());
    }
}

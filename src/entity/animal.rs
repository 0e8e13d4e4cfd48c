use serde::{Deserialize, Serialize};

use crate::entity::EntityHeader;
use crate::world::tile::Biome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferredTime {
    Day,
    Night,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimalState {
    Idle,
    Moving,
    Hunting,
    Fleeing,
    Resting,
    Drinking,
    ReturningHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalNeeds {
    pub hunger: f64,
    pub thirst: f64,
    pub rest: f64,
    pub safety: f64,
}

impl AnimalNeeds {
    pub fn satisfied() -> Self {
        AnimalNeeds {
            hunger: 0.0,
            thirst: 0.0,
            rest: 0.0,
            safety: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Wolf,
    Bear,
    Deer,
    Rabbit,
}

impl Species {
    pub fn attack_damage(self) -> f64 {
        match self {
            Species::Wolf => 25.0,
            Species::Bear => 30.0,
            _ => 20.0,
        }
    }
}

const CRITICAL_NEED: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub header: EntityHeader,
    pub species: Species,
    pub is_predator: bool,
    pub is_prey: bool,
    pub preferred_biomes: Vec<Biome>,
    pub preferred_time: PreferredTime,
    pub home_location: (f64, f64),
    pub needs: AnimalNeeds,
    pub state: AnimalState,
    pub behavior_cooldown: f64,
    pub known_food_sources: Vec<(f64, f64)>,
    pub known_water_sources: Vec<(f64, f64)>,
}

impl Animal {
    pub fn new(header: EntityHeader, species: Species, home_location: (f64, f64)) -> Self {
        let (is_predator, is_prey) = match species {
            Species::Wolf | Species::Bear => (true, false),
            Species::Deer | Species::Rabbit => (false, true),
        };
        Animal {
            header,
            species,
            is_predator,
            is_prey,
            preferred_biomes: Vec::new(),
            preferred_time: PreferredTime::Any,
            home_location,
            needs: AnimalNeeds::satisfied(),
            state: AnimalState::Idle,
            behavior_cooldown: 0.0,
            known_food_sources: Vec::new(),
            known_water_sources: Vec::new(),
        }
    }

    pub fn decay_needs(&mut self, dt: f64) {
        self.needs.hunger = (self.needs.hunger + 0.08 * dt).min(100.0);
        self.needs.thirst = (self.needs.thirst + 0.12 * dt).min(100.0);
        self.needs.rest = (self.needs.rest + 0.05 * dt).min(100.0);
    }

    pub fn assess_threats(&mut self, threats_nearby: bool) {
        self.needs.safety = if threats_nearby {
            (self.needs.safety + 20.0).min(100.0)
        } else {
            (self.needs.safety - 5.0).max(0.0)
        };
    }

    /// Behavior precedence, highest first: fleeing, off-schedule rest,
    /// critical rest/drink, predator-hunt or prey-gather, return-home,
    /// idle/move.
    pub fn decide_behavior(&mut self, threats_nearby: bool, is_preferred_time: bool, distance_from_home: f64) -> AnimalState {
        let state = if threats_nearby && self.needs.safety > CRITICAL_NEED {
            AnimalState::Fleeing
        } else if !is_preferred_time {
            AnimalState::Resting
        } else if self.needs.rest > CRITICAL_NEED {
            AnimalState::Resting
        } else if self.needs.thirst > CRITICAL_NEED {
            AnimalState::Drinking
        } else if self.is_predator && self.needs.hunger > 50.0 {
            AnimalState::Hunting
        } else if self.is_prey && self.needs.hunger > 50.0 {
            AnimalState::Moving
        } else if !is_preferred_time && distance_from_home > self.header.vision_range {
            AnimalState::ReturningHome
        } else {
            AnimalState::Idle
        };
        self.state = state;
        state
    }

    pub fn attack_damage(&self) -> f64 {
        self.species.attack_damage()
    }

    /// Sets `header.velocity` for the current behavior state. Only
    /// `ReturningHome` has a concrete destination (`home_location`); the
    /// other active states keep whatever heading `decide_behavior` last
    /// produced, and idle/resting states stop.
    pub fn update_velocity(&mut self) {
        self.header.velocity = match self.state {
            AnimalState::ReturningHome => {
                crate::entity::direction_toward(self.header.pos, self.home_location, self.header.speed)
            }
            AnimalState::Idle | AnimalState::Resting | AnimalState::Drinking => (0.0, 0.0),
            _ => self.header.velocity,
        };
    }

    /// Integrates `header.velocity` into `header.pos`.
    pub fn apply_movement(&mut self, dt: f64) {
        self.header.pos.0 += self.header.velocity.0 * dt;
        self.header.pos.1 += self.header.velocity.1 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityKind};

    fn sample_header() -> EntityHeader {
        EntityHeader::new(EntityId(1), EntityKind::Animal, (0.0, 0.0))
    }

    #[test]
    fn wolf_is_predator_deer_is_prey() {
        let wolf = Animal::new(sample_header(), Species::Wolf, (0.0, 0.0));
        let deer = Animal::new(sample_header(), Species::Deer, (0.0, 0.0));
        assert!(wolf.is_predator && !wolf.is_prey);
        assert!(deer.is_prey && !deer.is_predator);
    }

    #[test]
    fn fleeing_takes_precedence_over_everything() {
        let mut a = Animal::new(sample_header(), Species::Deer, (0.0, 0.0));
        a.needs.safety = 90.0;
        a.needs.rest = 90.0;
        let state = a.decide_behavior(true, true, 0.0);
        assert_eq!(state, AnimalState::Fleeing);
    }

    #[test]
    fn critical_thirst_beats_hunting_when_not_fleeing() {
        let mut a = Animal::new(sample_header(), Species::Wolf, (0.0, 0.0));
        a.needs.thirst = 90.0;
        a.needs.hunger = 90.0;
        let state = a.decide_behavior(false, true, 0.0);
        assert_eq!(state, AnimalState::Drinking);
    }

    #[test]
    fn bear_deals_more_damage_than_default() {
        assert!(Species::Bear.attack_damage() > Species::Wolf.attack_damage());
    }

    #[test]
    fn off_schedule_time_forces_rest_unless_fleeing() {
        let mut a = Animal::new(sample_header(), Species::Rabbit, (0.0, 0.0));
        let state = a.decide_behavior(false, false, 0.0);
        assert_eq!(state, AnimalState::Resting);
    }

    #[test]
    fn returning_home_velocity_points_at_home_and_moves_closer() {
        let mut a = Animal::new(sample_header(), Species::Deer, (100.0, 0.0));
        a.header.pos = (0.0, 0.0);
        a.state = AnimalState::ReturningHome;
        a.update_velocity();
        assert!(a.header.velocity.0 > 0.0);
        a.apply_movement(1.0);
        assert!(a.header.pos.0 > 0.0 && a.header.pos.0 <= 100.0);
    }

    #[test]
    fn idle_state_zeroes_velocity() {
        let mut a = Animal::new(sample_header(), Species::Deer, (0.0, 0.0));
        a.header.velocity = (5.0, 5.0);
        a.state = AnimalState::Idle;
        a.update_velocity();
        assert_eq!(a.header.velocity, (0.0, 0.0));
    }
}

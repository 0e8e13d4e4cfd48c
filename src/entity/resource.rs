use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityHeader, EntityId};
use crate::world::tile::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub header: EntityHeader,
    pub resource_type: ResourceKind,
    pub quantity: f64,
    pub max_quantity: f64,
    pub regeneration_rate: f64,
    pub quality: f64,
    pub is_depleted: bool,
    pub depletion_time: Option<f64>,
    pub current_users: HashSet<EntityId>,
    pub times_harvested: u32,
    pub total_harvested: f64,
}

impl Resource {
    pub fn new(header: EntityHeader, resource_type: ResourceKind, max_quantity: f64, quality: f64) -> Self {
        Resource {
            header,
            resource_type,
            quantity: max_quantity,
            max_quantity,
            regeneration_rate: max_quantity * 0.01,
            quality,
            is_depleted: false,
            depletion_time: None,
            current_users: HashSet::new(),
            times_harvested: 0,
            total_harvested: 0.0,
        }
    }

    /// `harvest_amount = min(request, quantity * efficiency)`, further
    /// scaled by `weather_modifier`. Marks the resource depleted (recording
    /// `depletion_time`) if quantity reaches zero.
    pub fn harvest(&mut self, request: f64, efficiency: f64, weather_modifier: f64, now: f64) -> f64 {
        if self.is_depleted {
            return 0.0;
        }
        let available = self.quantity * efficiency * weather_modifier;
        let amount = request.min(available).max(0.0);
        self.quantity = (self.quantity - amount).max(0.0);
        self.times_harvested += 1;
        self.total_harvested += amount;
        if self.quantity <= 0.0 {
            self.is_depleted = true;
            self.depletion_time = Some(now);
        }
        amount
    }

    /// Seconds past depletion before regeneration may begin:
    /// `base_delay * (1 + 0.1 * times_harvested) / season_growth_modifier`.
    pub fn regeneration_delay(&self, base_delay: f64, season_growth_modifier: f64) -> f64 {
        let modifier = if season_growth_modifier <= 0.0 {
            f64::EPSILON
        } else {
            season_growth_modifier
        };
        base_delay * (1.0 + 0.1 * self.times_harvested as f64) / modifier
    }

    pub fn try_regenerate(&mut self, now: f64, base_delay: f64, season_growth_modifier: f64, dt: f64) {
        if !self.is_depleted {
            self.quantity = (self.quantity + self.regeneration_rate * dt).min(self.max_quantity);
            return;
        }
        let Some(depleted_at) = self.depletion_time else {
            return;
        };
        if now - depleted_at >= self.regeneration_delay(base_delay, season_growth_modifier) {
            self.quantity = (self.quantity + self.regeneration_rate * dt).min(self.max_quantity);
            if self.quantity > 0.0 {
                self.is_depleted = false;
                self.depletion_time = None;
            }
        }
    }

    /// Storm or rain reduces quantity by `(1 - weather_resistance) * dt`,
    /// doubled during a storm.
    pub fn apply_weather_damage(&mut self, weather_resistance: f64, dt: f64, is_storm: bool) {
        let base = (1.0 - weather_resistance).max(0.0) * dt;
        let damage = if is_storm { base * 2.0 } else { base };
        self.quantity = (self.quantity - damage).max(0.0);
        if self.quantity <= 0.0 && !self.is_depleted {
            self.is_depleted = true;
        }
    }

    pub fn attach_user(&mut self, id: EntityId) {
        self.current_users.insert(id);
    }

    pub fn detach_user(&mut self, id: EntityId) {
        self.current_users.remove(&id);
    }
}

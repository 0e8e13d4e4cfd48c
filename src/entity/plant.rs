use serde::{Deserialize, Serialize};

use crate::entity::EntityHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantType {
    Tree,
    Bush,
    Grass,
    Flower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub header: EntityHeader,
    pub plant_type: PlantType,
    pub growth_stage: f64,
    pub growth_rate: f64,
    pub seasonal_growth_modifier: f64,
}

impl Plant {
    pub fn new(header: EntityHeader, plant_type: PlantType, growth_rate: f64) -> Self {
        Plant {
            header,
            plant_type,
            growth_stage: 0.0,
            growth_rate,
            seasonal_growth_modifier: 1.0,
        }
    }

    pub fn grow(&mut self, dt: f64) {
        self.growth_stage =
            (self.growth_stage + self.growth_rate * self.seasonal_growth_modifier * dt).clamp(0.0, 1.0);
    }

    pub fn is_mature(&self) -> bool {
        self.growth_stage >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityKind};

    fn sample_header() -> EntityHeader {
        EntityHeader::new(EntityId(1), EntityKind::Plant, (0.0, 0.0))
    }

    #[test]
    fn growth_clamps_at_one() {
        let mut p = Plant::new(sample_header(), PlantType::Tree, 0.5);
        p.grow(10.0);
        assert_eq!(p.growth_stage, 1.0);
        assert!(p.is_mature());
    }

    #[test]
    fn seasonal_modifier_scales_growth() {
        let mut p = Plant::new(sample_header(), PlantType::Grass, 0.1);
        p.seasonal_growth_modifier = 0.0;
        p.grow(5.0);
        assert_eq!(p.growth_stage, 0.0);
    }
}

use serde::{Deserialize, Serialize};

/// The 16 closed terrain categories. Ordering matches the elevation
/// thresholds in [`crate::world::terrain`], low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    DeepOcean,
    Ocean,
    Beach,
    Tundra,
    SnowyPlains,
    Plains,
    Forest,
    Rainforest,
    Desert,
    Savanna,
    Jungle,
    Hills,
    ForestHills,
    SnowyMountains,
    Mountains,
    SnowyPeaks,
}

impl Biome {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Biome::DeepOcean | Biome::Ocean)
    }

    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::Ocean)
    }
}

/// A harvestable deposit placed deterministically at generation time.
/// Instantiating it into a live `Resource` entity happens when the chunk
/// is first activated, not at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeposit {
    pub kind: ResourceKind,
    pub quality: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Berry,
    Wood,
    Stone,
    Ore,
    Fish,
    Herb,
}

/// A terrain decoration. The only field with simulation effect is
/// `provides_shelter`, consumed by the weather exposure check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    pub provides_shelter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Tree,
    Rock,
    Cave,
    Ruin,
    Bush,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub biome: Biome,
    pub elevation: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub walkable: bool,
    pub resources: Vec<ResourceDeposit>,
    pub features: Vec<Feature>,
}

impl Tile {
    pub fn neutral() -> Self {
        Tile {
            biome: Biome::Plains,
            elevation: 0.5,
            moisture: 0.5,
            temperature: 0.5,
            walkable: true,
            resources: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn provides_shelter(&self) -> bool {
        self.features.iter().any(|f| f.provides_shelter)
    }
}

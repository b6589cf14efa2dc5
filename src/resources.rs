//! Harvestable resource placement.
//!
//! Priority is fixed: crystal, then stone, then tree. A cell receives at
//! most one resource, the first whose condition holds.

use crate::biome::BiomeProfile;
use crate::context::GenerationContext;
use crate::noise_field::NoiseField;
use crate::world::{Resource, TerrainType};

/// Normalized resource-noise readings for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceSample {
    pub crystal: f64,
    pub stone: f64,
    pub tree: f64,
}

/// Thresholds for one run, resolved from the context and biome profile.
#[derive(Clone, Copy, Debug)]
pub struct ResourceAssigner {
    crystal_threshold: f64,
    stone_threshold: f64,
    tree_threshold: f64,
    trees_need_oasis: bool,
}

impl ResourceAssigner {
    pub fn new(context: &GenerationContext) -> Self {
        Self::with_profile(context, context.profile())
    }

    pub fn with_profile(context: &GenerationContext, profile: &BiomeProfile) -> Self {
        Self {
            crystal_threshold: context.crystal_threshold,
            stone_threshold: context.stone_threshold,
            tree_threshold: 1.0 - context.tree_density * profile.tree_density_multiplier,
            trees_need_oasis: profile.trees_need_oasis,
        }
    }

    /// Normalized tree noise has to exceed this for a tree to grow.
    pub fn tree_threshold(&self) -> f64 {
        self.tree_threshold
    }

    /// Sample the three resource channels at `(x, y)`.
    pub fn sample(crystal: &NoiseField, stone: &NoiseField, tree: &NoiseField, x: usize, y: usize) -> ResourceSample {
        let (x, y) = (x as i64, y as i64);
        ResourceSample {
            crystal: crystal.sample_normalized(x, y),
            stone: stone.sample_normalized(x, y),
            tree: tree.sample_normalized(x, y),
        }
    }

    /// Pick the resource for a cell of category `terrain`.
    pub fn assign(&self, terrain: TerrainType, sample: ResourceSample) -> Option<Resource> {
        if !terrain.is_land() {
            return None;
        }

        if sample.crystal > self.crystal_threshold {
            return Some(Resource::Crystal);
        }
        if sample.stone > self.stone_threshold {
            return Some(Resource::Stone);
        }

        let can_grow = if self.trees_need_oasis {
            terrain == TerrainType::Grass
        } else {
            terrain.is_fertile()
        };
        if can_grow && sample.tree > self.tree_threshold {
            return Some(Resource::Tree);
        }

        None
    }
}

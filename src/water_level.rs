//! Water level reclassification
//!
//! Runs once over the finished terrain pass and sorts low-lying cells into
//! water tiers using the biome's rule set. Only stored elevation and
//! temperature are read; noise is never re-sampled here.

use tracing::debug;

use crate::biome::WaterRules;
use crate::world::{Cell, Grid, TerrainType};

// Base / Tundra thresholds
const DEEP_LEVEL: f64 = -0.4;
const SHALLOW_LEVEL: f64 = -0.2;

// Islands thresholds
const ISLAND_DEEP_LEVEL: f64 = -0.6;
const ISLAND_SHALLOW_LEVEL: f64 = -0.4;
const ISLAND_BEACH_LEVEL: f64 = -0.2;

// Rivers thresholds (stricter so more land survives for carving)
const RIVERS_DEEP_LEVEL: f64 = -0.6;
const RIVERS_SHALLOW_LEVEL: f64 = -0.5;

/// Normalized temperature below which tundra shallows freeze.
const FREEZE_TEMPERATURE: f64 = 0.3;

/// Counts of what the water pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaterLevelReport {
    pub deep_water: usize,
    pub shallow_water: usize,
    pub ice: usize,
    pub sand: usize,
    pub resources_cleared: usize,
}

/// Biome-specific water-level pass.
#[derive(Clone, Copy, Debug)]
pub struct WaterLevelClassifier {
    rules: WaterRules,
}

impl WaterLevelClassifier {
    pub fn new(rules: WaterRules) -> Self {
        Self { rules }
    }

    /// Reclassify every cell of `grid` in place.
    pub fn apply(&self, grid: &mut Grid) -> WaterLevelReport {
        let mut report = WaterLevelReport::default();

        for (_, _, cell) in grid.iter_mut() {
            let Some(tier) = self.tier_for(cell) else {
                continue;
            };

            match tier {
                TerrainType::DeepWater => report.deep_water += 1,
                TerrainType::ShallowWater => report.shallow_water += 1,
                TerrainType::Ice => report.ice += 1,
                TerrainType::Sand => report.sand += 1,
                _ => {}
            }

            if tier.is_water() {
                if cell.resource.is_some() {
                    report.resources_cleared += 1;
                }
                cell.flood(tier);
            } else {
                cell.terrain = tier;
            }
        }

        debug!(rules = ?self.rules, ?report, "water levels applied");
        report
    }

    /// New category for a cell, or `None` if it stays as classified.
    fn tier_for(&self, cell: &Cell) -> Option<TerrainType> {
        let e = cell.elevation;
        match self.rules {
            WaterRules::Base => {
                if e < DEEP_LEVEL {
                    Some(TerrainType::DeepWater)
                } else if e < SHALLOW_LEVEL {
                    Some(TerrainType::ShallowWater)
                } else {
                    None
                }
            }
            WaterRules::Islands => {
                if e < ISLAND_DEEP_LEVEL {
                    Some(TerrainType::DeepWater)
                } else if e < ISLAND_SHALLOW_LEVEL {
                    Some(TerrainType::ShallowWater)
                } else if e < ISLAND_BEACH_LEVEL {
                    Some(TerrainType::Sand)
                } else {
                    None
                }
            }
            WaterRules::Tundra => {
                if e < DEEP_LEVEL {
                    Some(TerrainType::DeepWater)
                } else if e < SHALLOW_LEVEL {
                    if cell.temperature < FREEZE_TEMPERATURE {
                        Some(TerrainType::Ice)
                    } else {
                        Some(TerrainType::ShallowWater)
                    }
                } else {
                    None
                }
            }
            WaterRules::Rivers => {
                if e < RIVERS_DEEP_LEVEL {
                    Some(TerrainType::DeepWater)
                } else if e < RIVERS_SHALLOW_LEVEL {
                    Some(TerrainType::ShallowWater)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Resource;

    /// One row of cells at the given elevations, each carrying a tree.
    fn row(elevations: &[f64], temperature: f64) -> Grid {
        Grid::from_fn(elevations.len(), 1, |x, y| Cell {
            elevation: elevations[x],
            temperature,
            resource: Some(Resource::Tree),
            ..Cell::new(x, y)
        })
    }

    fn terrains(grid: &Grid) -> Vec<TerrainType> {
        grid.values().map(|c| c.terrain).collect()
    }

    #[test]
    fn test_base_rules() {
        let mut grid = row(&[-0.5, -0.4, -0.3, -0.2, 0.1], 0.5);
        let report = WaterLevelClassifier::new(WaterRules::Base).apply(&mut grid);

        use TerrainType::*;
        assert_eq!(terrains(&grid), vec![DeepWater, ShallowWater, ShallowWater, Grass, Grass]);
        assert_eq!(report.deep_water, 1);
        assert_eq!(report.shallow_water, 2);
        assert_eq!(report.resources_cleared, 3);
        assert!(grid.values().filter(|c| c.terrain.is_water()).all(|c| c.resource.is_none()));
        assert_eq!(grid[(4, 0)].resource, Some(Resource::Tree));
    }

    #[test]
    fn test_island_rules_keep_resources_on_sand() {
        let mut grid = row(&[-0.7, -0.5, -0.3, 0.0], 0.5);
        let report = WaterLevelClassifier::new(WaterRules::Islands).apply(&mut grid);

        use TerrainType::*;
        assert_eq!(terrains(&grid), vec![DeepWater, ShallowWater, Sand, Grass]);
        assert_eq!(report.sand, 1);
        assert_eq!(grid[(0, 0)].resource, None);
        assert_eq!(grid[(1, 0)].resource, None);
        assert_eq!(grid[(2, 0)].resource, Some(Resource::Tree));
    }

    #[test]
    fn test_tundra_freezes_cold_shallows() {
        let mut cold = row(&[-0.5, -0.3], 0.1);
        let mut mild = row(&[-0.5, -0.3], 0.6);
        let rules = WaterLevelClassifier::new(WaterRules::Tundra);
        rules.apply(&mut cold);
        rules.apply(&mut mild);

        assert_eq!(terrains(&cold), vec![TerrainType::DeepWater, TerrainType::Ice]);
        assert_eq!(terrains(&mild), vec![TerrainType::DeepWater, TerrainType::ShallowWater]);
        assert!(cold.values().chain(mild.values()).all(|c| c.resource.is_none()));
    }

    #[test]
    fn test_river_rules_are_stricter() {
        let mut grid = row(&[-0.7, -0.55, -0.45, -0.3], 0.5);
        WaterLevelClassifier::new(WaterRules::Rivers).apply(&mut grid);

        use TerrainType::*;
        assert_eq!(terrains(&grid), vec![DeepWater, ShallowWater, Grass, Grass]);
        assert_eq!(grid[(2, 0)].resource, Some(Resource::Tree));
    }
}

//! World data container module
//!
//! Bundles the generated grid with the parameters that produced it and
//! the hydrology summary, so consumers get everything in one value.

use std::collections::BTreeMap;
use std::fmt;

use crate::biome::Biome;
use crate::context::GenerationContext;
use crate::hydrology::HydrologyReport;
use crate::tilemap::Tilemap;
use crate::water_level::WaterLevelReport;

/// Terrain category of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum TerrainType {
    DeepWater,
    ShallowWater,
    River,
    Ice,
    Sand,
    #[default]
    Grass,
    Dirt,
    Stone,
    Snow,
}

impl TerrainType {
    pub fn all() -> &'static [Self] {
        &[
            Self::DeepWater,
            Self::ShallowWater,
            Self::River,
            Self::Ice,
            Self::Sand,
            Self::Grass,
            Self::Dirt,
            Self::Stone,
            Self::Snow,
        ]
    }

    /// Water tiers, including frozen water and carved rivers.
    pub fn is_water(&self) -> bool {
        matches!(self, Self::DeepWater | Self::ShallowWater | Self::River | Self::Ice)
    }

    pub fn is_land(&self) -> bool {
        !self.is_water()
    }

    /// Categories trees can grow on.
    pub fn is_fertile(&self) -> bool {
        matches!(self, Self::Grass | Self::Dirt)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DeepWater => "Deep Water",
            Self::ShallowWater => "Shallow Water",
            Self::River => "River",
            Self::Ice => "Ice",
            Self::Sand => "Sand",
            Self::Grass => "Grass",
            Self::Dirt => "Dirt",
            Self::Stone => "Stone",
            Self::Snow => "Snow",
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Harvestable resource placed on a land cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Resource {
    Stone,
    Crystal,
    Tree,
}

impl Resource {
    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Stone => "Stone",
            Resource::Crystal => "Crystal",
            Resource::Tree => "Tree",
        }
    }
}

/// One grid cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    /// Raw elevation noise in [-1, 1] (island shaping may push it lower)
    pub elevation: f64,
    /// Normalized temperature (0.0-1.0)
    pub temperature: f64,
    /// Normalized moisture (0.0-1.0)
    pub moisture: f64,
    pub terrain: TerrainType,
    pub resource: Option<Resource>,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y, ..Default::default() }
    }

    /// Turn the cell into water (or ice) and drop whatever grew on it.
    pub fn flood(&mut self, terrain: TerrainType) {
        self.terrain = terrain;
        self.resource = None;
    }
}

/// The generated grid.
pub type Grid = Tilemap<Cell>;

/// All generated world data bundled together
#[derive(Clone, Debug)]
pub struct World {
    /// Parameters that produced this world (allows recreation)
    pub context: GenerationContext,
    pub width: usize,
    pub height: usize,
    grid: Grid,
    pub water_levels: WaterLevelReport,
    /// `None` when river density is zero and the hydrology pass was skipped
    pub hydrology: Option<HydrologyReport>,
}

impl World {
    pub fn new(
        context: GenerationContext,
        grid: Grid,
        water_levels: WaterLevelReport,
        hydrology: Option<HydrologyReport>,
    ) -> Self {
        Self {
            context,
            width: grid.width,
            height: grid.height,
            grid,
            water_levels,
            hydrology,
        }
    }

    pub fn seed(&self) -> u64 {
        self.context.seed
    }

    pub fn biome(&self) -> Biome {
        self.context.biome
    }

    /// Cell at `(x, y)`, or `None` outside the map.
    pub fn get(&self, x: isize, y: isize) -> Option<&Cell> {
        self.grid.get(x, y)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.values()
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats::from_grid(&self.grid)
    }
}

/// Per-category counts over a finished grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldStats {
    pub total_cells: usize,
    pub terrain_counts: BTreeMap<TerrainType, usize>,
    pub resource_counts: BTreeMap<Resource, usize>,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

impl WorldStats {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut stats = WorldStats {
            min_elevation: f64::MAX,
            max_elevation: f64::MIN,
            ..Default::default()
        };

        for cell in grid.values() {
            stats.total_cells += 1;
            *stats.terrain_counts.entry(cell.terrain).or_insert(0) += 1;
            if let Some(resource) = cell.resource {
                *stats.resource_counts.entry(resource).or_insert(0) += 1;
            }
            stats.min_elevation = stats.min_elevation.min(cell.elevation);
            stats.max_elevation = stats.max_elevation.max(cell.elevation);
        }

        stats
    }

    pub fn terrain(&self, terrain: TerrainType) -> usize {
        self.terrain_counts.get(&terrain).copied().unwrap_or(0)
    }

    pub fn resource(&self, resource: Resource) -> usize {
        self.resource_counts.get(&resource).copied().unwrap_or(0)
    }

    pub fn water_cells(&self) -> usize {
        self.terrain_counts
            .iter()
            .filter(|(terrain, _)| terrain.is_water())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn land_fraction(&self) -> f64 {
        if self.total_cells == 0 {
            return 0.0;
        }
        (self.total_cells - self.water_cells()) as f64 / self.total_cells as f64
    }
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cells: {} ({:.1}% land)", self.total_cells, self.land_fraction() * 100.0)?;
        writeln!(f, "Elevation range: {:.3} to {:.3}", self.min_elevation, self.max_elevation)?;
        writeln!(f, "Terrain:")?;
        for (terrain, count) in &self.terrain_counts {
            let pct = 100.0 * *count as f64 / self.total_cells.max(1) as f64;
            writeln!(f, "  {:<14} {:>7} ({:5.1}%)", terrain.display_name(), count, pct)?;
        }
        write!(f, "Resources:")?;
        if self.resource_counts.is_empty() {
            write!(f, " none")?;
        }
        for (resource, count) in &self.resource_counts {
            write!(f, "\n  {:<14} {:>7}", resource.display_name(), count)?;
        }
        Ok(())
    }
}

//! River, lake and tributary carving.
//!
//! Rivers start at high land and walk downhill by steepest descent:
//! 1. Sources - land cells above `SOURCE_ELEVATION`, shuffled
//! 2. River walk - always step to the lowest eligible neighbor, stop when
//!    reaching water, running out of steps, or hitting a dead end
//! 3. Lakes - a dead end in the lowlands floods a small basin
//! 4. Tributaries - occasional side branches from long rivers
//!
//! A single visited grid is shared by the whole pass so rivers never cross
//! or retrace each other.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::context::GenerationContext;
use crate::tilemap::Tilemap;
use crate::world::{Grid, TerrainType};

/// Minimum elevation for a river source.
pub const SOURCE_ELEVATION: f64 = 0.6;
/// Rivers carved per source per unit of river density.
const RIVERS_PER_SOURCE: f64 = 0.1;

/// Step budget of a main river (inclusive range).
pub const MIN_RIVER_STEPS: usize = 100;
pub const MAX_RIVER_STEPS: usize = 300;

/// Tributaries only branch off after this many steps.
const TRIBUTARY_MIN_STEP: usize = 30;
const TRIBUTARY_CHANCE: f64 = 0.01;
pub const MIN_TRIBUTARY_STEPS: usize = 20;
pub const MAX_TRIBUTARY_STEPS: usize = 70;

/// Dead ends at or above this elevation do not form lakes.
const LAKE_MAX_ELEVATION: f64 = 0.4;
/// Basin cells may sit this much above the dead end and still flood.
const LAKE_DEPTH_TOLERANCE: f64 = 0.05;
const LAKE_MIN_RADIUS: isize = 2;
const LAKE_MAX_RADIUS: isize = 5;

/// Whether a walk is a main river or a side branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkKind {
    Main,
    Tributary,
}

/// Why a river walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEnd {
    /// Flowed into existing water (sea, lake or another river)
    ReachedWater,
    /// Tributary joined cells already claimed by the network
    Merged,
    /// No lower neighbor was left; `lake` tells whether a basin flooded
    DeadEnd { lake: bool },
    /// Ran out of steps
    StepLimit,
}

/// Cells walked by one river or tributary, source first.
#[derive(Clone, Debug, PartialEq)]
pub struct RiverPath {
    pub kind: WalkKind,
    pub cells: Vec<(usize, usize)>,
    pub end: WalkEnd,
}

/// Summary of a hydrology pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HydrologyReport {
    /// Candidate source cells found before selection
    pub sources: usize,
    /// Number of main rivers the density asked for
    pub target_rivers: usize,
    pub paths: Vec<RiverPath>,
    pub lakes: usize,
    pub lake_cells: usize,
    /// Land cells converted to river terrain
    pub river_cells: usize,
}

impl HydrologyReport {
    pub fn river_count(&self) -> usize {
        self.paths.iter().filter(|p| p.kind == WalkKind::Main).count()
    }

    pub fn tributary_count(&self) -> usize {
        self.paths.iter().filter(|p| p.kind == WalkKind::Tributary).count()
    }
}

/// Number of main rivers for `source_count` candidate sources.
pub fn river_target(source_count: usize, river_density: f64) -> usize {
    ((source_count as f64 * river_density * RIVERS_PER_SOURCE).floor() as usize).max(1)
}

/// Land cells high enough to start a river, in row-major order.
pub fn find_sources(grid: &Grid) -> Vec<(usize, usize)> {
    grid.iter()
        .filter(|(_, _, cell)| cell.terrain.is_land() && cell.elevation > SOURCE_ELEVATION)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Carves rivers and lakes into a classified grid.
#[derive(Clone, Copy, Debug)]
pub struct HydrologyEngine {
    river_density: f64,
    lake_terrain: TerrainType,
}

impl HydrologyEngine {
    pub fn new(context: &GenerationContext) -> Self {
        let lake_terrain = if context.profile().frozen_lakes {
            TerrainType::Ice
        } else {
            TerrainType::ShallowWater
        };
        Self {
            river_density: context.river_density,
            lake_terrain,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.river_density > 0.0
    }

    /// Run the full pass. With zero river density the grid is untouched.
    pub fn carve<R: Rng>(&self, grid: &mut Grid, rng: &mut R) -> HydrologyReport {
        let mut report = HydrologyReport::default();
        if !self.is_enabled() {
            return report;
        }

        let mut sources = find_sources(grid);
        report.sources = sources.len();
        if sources.is_empty() {
            debug!("no land above {} - skipping rivers", SOURCE_ELEVATION);
            return report;
        }

        sources.shuffle(&mut *rng);
        report.target_rivers = river_target(sources.len(), self.river_density);

        let mut carver = RiverCarver {
            visited: Tilemap::new_with(grid.width, grid.height, false),
            grid,
            rng,
            lake_terrain: self.lake_terrain,
            report,
        };

        let mut rivers = 0;
        for source in sources {
            if rivers >= carver.report.target_rivers {
                break;
            }
            if carver.visited[source] {
                continue;
            }
            let max_steps = carver.rng.gen_range(MIN_RIVER_STEPS..=MAX_RIVER_STEPS);
            carver.walk(source, max_steps, WalkKind::Main);
            rivers += 1;
        }

        carver.clear_river_resources();

        let report = carver.report;
        debug!(
            rivers = report.river_count(),
            tributaries = report.tributary_count(),
            lakes = report.lakes,
            river_cells = report.river_cells,
            "hydrology carved"
        );
        report
    }
}

/// State of one carving pass.
struct RiverCarver<'a, R: Rng> {
    grid: &'a mut Grid,
    rng: &'a mut R,
    visited: Tilemap<bool>,
    lake_terrain: TerrainType,
    report: HydrologyReport,
}

impl<R: Rng> RiverCarver<'_, R> {
    /// Walk downhill from `start` for at most `max_steps` moves.
    fn walk(&mut self, start: (usize, usize), max_steps: usize, kind: WalkKind) -> WalkEnd {
        let mut segment = Vec::new();
        let mut current = start;
        let mut steps = 0;

        let end = loop {
            if self.grid[current].terrain.is_water() {
                break WalkEnd::ReachedWater;
            }
            self.visited[current] = true;
            segment.push(current);

            if steps >= max_steps {
                break WalkEnd::StepLimit;
            }

            // A branch must leave through fresh ground before it may join
            // the network again.
            let may_merge = kind == WalkKind::Tributary && steps > 0;
            let Some(next) = self.next_step(current, may_merge) else {
                let lake = self.carve_lake(current);
                break WalkEnd::DeadEnd { lake };
            };
            if may_merge && self.visited[next] && !self.grid[next].terrain.is_water() {
                break WalkEnd::Merged;
            }
            steps += 1;

            if kind == WalkKind::Main && steps > TRIBUTARY_MIN_STEP && self.rng.gen_bool(TRIBUTARY_CHANCE) {
                // Reserve the main channel so the branch takes another way down.
                self.visited[next] = true;
                let length = self.rng.gen_range(MIN_TRIBUTARY_STEPS..=MAX_TRIBUTARY_STEPS);
                self.walk(current, length, WalkKind::Tributary);
            }

            current = next;
        };

        self.apply_segment(&segment);
        trace!(?kind, ?start, length = segment.len(), ?end, "river walked");
        self.report.paths.push(RiverPath { kind, cells: segment, end });
        end
    }

    /// Lowest eligible neighbor, ties broken uniformly at random.
    ///
    /// Eligible: strictly lower than `from` and either unvisited or already
    /// water. With `may_merge`, lower visited cells are eligible too.
    fn next_step(&mut self, from: (usize, usize), may_merge: bool) -> Option<(usize, usize)> {
        let here = self.grid[from].elevation;

        let candidates: Vec<((usize, usize), f64)> = self
            .grid
            .neighbors_8(from.0, from.1)
            .filter_map(|pos| {
                let cell = &self.grid[pos];
                if cell.elevation >= here {
                    return None;
                }
                let open = !self.visited[pos] || cell.terrain.is_water() || may_merge;
                open.then_some((pos, cell.elevation))
            })
            .collect();

        let lowest = candidates.iter().map(|&(_, e)| e).fold(f64::INFINITY, f64::min);
        let ties: Vec<(usize, usize)> = candidates
            .iter()
            .filter(|&&(_, e)| e == lowest)
            .map(|&(pos, _)| pos)
            .collect();

        ties.choose(&mut *self.rng).copied()
    }

    /// Flood the basin around a dead end. Returns whether a lake formed.
    fn carve_lake(&mut self, (cx, cy): (usize, usize)) -> bool {
        let center = &self.grid[(cx, cy)];
        if center.elevation >= LAKE_MAX_ELEVATION || !center.terrain.is_land() {
            return false;
        }

        let limit = center.elevation + LAKE_DEPTH_TOLERANCE;
        let radius = self.rng.gen_range(LAKE_MIN_RADIUS..=LAKE_MAX_RADIUS);
        let mut flooded = 0;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let Some(cell) = self.grid.get_mut(cx as isize + dx, cy as isize + dy) else {
                    continue;
                };
                if cell.terrain.is_land() && cell.elevation < limit {
                    cell.flood(self.lake_terrain);
                    flooded += 1;
                }
            }
        }

        self.report.lakes += 1;
        self.report.lake_cells += flooded;
        true
    }

    /// Turn the land cells of a walked segment into river.
    fn apply_segment(&mut self, segment: &[(usize, usize)]) {
        for &pos in segment {
            let cell = &mut self.grid[pos];
            if cell.terrain.is_land() {
                cell.flood(TerrainType::River);
                self.report.river_cells += 1;
            }
        }
    }

    /// Sweep the whole network once more and strip resources from river cells.
    fn clear_river_resources(&mut self) {
        for (x, y, &visited) in self.visited.iter() {
            let cell = &mut self.grid[(x, y)];
            if visited && cell.terrain == TerrainType::River {
                cell.resource = None;
            }
        }
    }
}

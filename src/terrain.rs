//! Terrain pass: sample climate channels for every cell, shape islands,
//! classify, and place resources.

use rand::Rng;
use tracing::debug;

use crate::classify::TileClassifier;
use crate::context::{GenerationContext, NoiseFields};
use crate::resources::ResourceAssigner;
use crate::world::{Cell, Grid};

// =============================================================================
// ISLAND SHAPING
// =============================================================================

/// Number of island centers scattered over an Islands map.
pub const ISLAND_COUNT: usize = 3;

/// Island centers are kept inside this fractional band of the map.
const ISLAND_MARGIN_MIN: f64 = 0.2;
const ISLAND_MARGIN_MAX: f64 = 0.8;

const FALLOFF_POWER: f64 = 2.0;
const ISLAND_HEIGHT_SCALE: f64 = 1.5;
const ISLAND_LIFT: f64 = 0.7;
const OCEAN_BASE: f64 = -0.5;

/// Radial falloff around a few random island centers.
#[derive(Clone, Debug, PartialEq)]
pub struct IslandShape {
    /// Centers in fractional map coordinates (0.0-1.0)
    pub centers: Vec<(f64, f64)>,
}

impl IslandShape {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let centers = (0..ISLAND_COUNT)
            .map(|_| {
                (
                    rng.gen_range(ISLAND_MARGIN_MIN..ISLAND_MARGIN_MAX),
                    rng.gen_range(ISLAND_MARGIN_MIN..ISLAND_MARGIN_MAX),
                )
            })
            .collect();
        Self { centers }
    }

    /// Strongest island influence at a fractional position (0.0-1.0).
    pub fn effect_at(&self, fx: f64, fy: f64) -> f64 {
        self.centers
            .iter()
            .map(|&(cx, cy)| {
                let distance = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
                (1.0 - 2.0 * distance).max(0.0).powf(FALLOFF_POWER)
            })
            .fold(0.0, f64::max)
    }

    /// Reshape raw elevation: open sea away from centers, raised land near them.
    pub fn apply(&self, elevation: f64, fx: f64, fy: f64) -> f64 {
        let effect = self.effect_at(fx, fy);
        elevation * effect * ISLAND_HEIGHT_SCALE + (effect * ISLAND_LIFT + OCEAN_BASE)
    }
}

// =============================================================================
// TERRAIN CLASSIFIER
// =============================================================================

/// Fills a fresh grid from the noise fields of one run.
pub struct TerrainClassifier<'a, C: TileClassifier + ?Sized> {
    context: &'a GenerationContext,
    fields: &'a NoiseFields,
    classifier: &'a C,
    resources: ResourceAssigner,
}

impl<'a, C: TileClassifier + ?Sized> TerrainClassifier<'a, C> {
    pub fn new(context: &'a GenerationContext, fields: &'a NoiseFields, classifier: &'a C) -> Self {
        Self {
            context,
            fields,
            classifier,
            resources: ResourceAssigner::new(context),
        }
    }

    /// Build the grid in row-major order. Draws island centers from `rng`
    /// only when the biome uses island shaping.
    pub fn build<R: Rng>(&self, width: usize, height: usize, rng: &mut R) -> Grid {
        let islands = self.context.profile().island_shaping.then(|| IslandShape::random(rng));
        if let Some(shape) = &islands {
            debug!(centers = ?shape.centers, "island centers placed");
        }

        Grid::from_fn(width, height, |x, y| self.classify_cell(x, y, width, height, islands.as_ref()))
    }

    fn classify_cell(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        islands: Option<&IslandShape>,
    ) -> Cell {
        let fields = self.fields;
        let (lx, ly) = (x as i64, y as i64);

        let mut elevation = fields.elevation.sample(lx, ly);
        let temperature = fields.temperature.sample_normalized(lx, ly);
        let moisture = fields.moisture.sample_normalized(lx, ly);

        if let Some(shape) = islands {
            let fx = x as f64 / width as f64;
            let fy = y as f64 / height as f64;
            elevation = shape.apply(elevation, fx, fy);
        }

        let terrain = self.classifier.classify(
            x,
            y,
            elevation,
            temperature,
            moisture,
            self.context.biome,
            self.context.seed,
        );

        let sample = ResourceAssigner::sample(&fields.crystal, &fields.stone, &fields.tree, x, y);
        let resource = self.resources.assign(terrain, sample);

        Cell {
            x,
            y,
            elevation,
            temperature,
            moisture,
            terrain,
            resource,
        }
    }
}

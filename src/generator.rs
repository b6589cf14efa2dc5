//! The generation pipeline.
//!
//! context -> noise fields -> terrain pass (with resources) -> water levels
//! -> rivers and lakes. The grid is only handed back once every pass has
//! run, so callers never observe a partial world.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::classify::{DefaultClassifier, TileClassifier};
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::hydrology::HydrologyEngine;
use crate::terrain::TerrainClassifier;
use crate::water_level::WaterLevelClassifier;
use crate::world::World;

/// Generate a `width` x `height` world with the bundled classifier.
pub fn generate(width: usize, height: usize, context: &GenerationContext) -> Result<World, GenerationError> {
    generate_with(width, height, context, &DefaultClassifier)
}

/// Generate a world using a caller-supplied terrain classifier.
pub fn generate_with<C: TileClassifier + ?Sized>(
    width: usize,
    height: usize,
    context: &GenerationContext,
    classifier: &C,
) -> Result<World, GenerationError> {
    if width == 0 || height == 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    context.validate()?;

    info!(width, height, biome = %context.biome, seed = context.seed, "generating world");

    // One stream for the whole run; every randomized step draws from it in order.
    let mut rng = ChaCha8Rng::seed_from_u64(context.seed);

    let channels = context.channel_configs();
    debug!(?channels, "noise channels derived");
    let fields = channels.build_fields(context.seed);

    let mut grid = TerrainClassifier::new(context, &fields, classifier).build(width, height, &mut rng);

    let water = WaterLevelClassifier::new(context.profile().water_rules);
    let water_levels = water.apply(&mut grid);

    let hydrology_engine = HydrologyEngine::new(context);
    let hydrology = hydrology_engine
        .is_enabled()
        .then(|| hydrology_engine.carve(&mut grid, &mut rng));

    let world = World::new(context.clone(), grid, water_levels, hydrology);
    info!(
        rivers = world.hydrology.as_ref().map_or(0, |h| h.river_count()),
        "world generated"
    );
    Ok(world)
}

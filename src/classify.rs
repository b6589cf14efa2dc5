//! Terrain category classification.
//!
//! The generator does not hard-code how climate maps to terrain; it calls a
//! [`TileClassifier`] once per cell. [`DefaultClassifier`] is the bundled
//! rule set. It only emits land categories: water tiers are decided later by
//! the water-level pass from the stored elevation.

use crate::biome::Biome;
use crate::world::TerrainType;

/// Maps sampled climate values for one cell to a terrain category.
pub trait TileClassifier {
    /// `temperature` and `moisture` are normalized to [0, 1]; `elevation` is
    /// raw noise (after any island shaping).
    #[allow(clippy::too_many_arguments)]
    fn classify(
        &self,
        x: usize,
        y: usize,
        elevation: f64,
        temperature: f64,
        moisture: f64,
        biome: Biome,
        seed: u64,
    ) -> TerrainType;
}

impl<F> TileClassifier for F
where
    F: Fn(usize, usize, f64, f64, f64, Biome, u64) -> TerrainType,
{
    fn classify(
        &self,
        x: usize,
        y: usize,
        elevation: f64,
        temperature: f64,
        moisture: f64,
        biome: Biome,
        seed: u64,
    ) -> TerrainType {
        self(x, y, elevation, temperature, moisture, biome, seed)
    }
}

/// Threshold-based classifier used by [`crate::generate`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;

impl TileClassifier for DefaultClassifier {
    fn classify(
        &self,
        _x: usize,
        _y: usize,
        elevation: f64,
        temperature: f64,
        moisture: f64,
        biome: Biome,
        _seed: u64,
    ) -> TerrainType {
        match biome {
            // Ridged elevation sits high on average; only the crests are rock.
            Biome::Desert => {
                if elevation > 0.85 {
                    TerrainType::Stone
                } else if moisture > 0.56 && elevation < 0.55 {
                    // Oasis
                    TerrainType::Grass
                } else if moisture > 0.5 && elevation < 0.65 {
                    TerrainType::Dirt
                } else {
                    TerrainType::Sand
                }
            }
            Biome::Tundra => {
                if elevation > 0.6 {
                    TerrainType::Stone
                } else if temperature < 0.4 {
                    TerrainType::Snow
                } else {
                    TerrainType::Grass
                }
            }
            Biome::Mountainous => {
                if elevation > 0.75 && temperature < 0.5 {
                    TerrainType::Snow
                } else if elevation > 0.45 {
                    TerrainType::Stone
                } else if moisture < 0.3 {
                    TerrainType::Dirt
                } else {
                    TerrainType::Grass
                }
            }
            _ => {
                if elevation < -0.1 {
                    TerrainType::Sand
                } else if elevation > 0.7 {
                    TerrainType::Stone
                } else if moisture < 0.25 {
                    TerrainType::Dirt
                } else {
                    TerrainType::Grass
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(elevation: f64, temperature: f64, moisture: f64, biome: Biome) -> TerrainType {
        DefaultClassifier.classify(0, 0, elevation, temperature, moisture, biome, 0)
    }

    #[test]
    fn test_never_emits_water() {
        for &biome in Biome::all() {
            for e in [-1.0, -0.5, -0.2, 0.0, 0.5, 0.9] {
                for t in [0.0, 0.5, 1.0] {
                    for m in [0.0, 0.5, 1.0] {
                        assert!(classify(e, t, m, biome).is_land(), "{} produced water", biome);
                    }
                }
            }
        }
    }

    #[test]
    fn test_desert_oasis() {
        assert_eq!(classify(0.1, 0.8, 0.9, Biome::Desert), TerrainType::Grass);
        assert_eq!(classify(0.1, 0.8, 0.2, Biome::Desert), TerrainType::Sand);
        assert_eq!(classify(0.55, 0.8, 0.9, Biome::Desert), TerrainType::Dirt);
        assert_eq!(classify(0.7, 0.8, 0.9, Biome::Desert), TerrainType::Sand);
        assert_eq!(classify(0.8, 0.8, 0.2, Biome::Desert), TerrainType::Sand);
        assert_eq!(classify(0.9, 0.8, 0.9, Biome::Desert), TerrainType::Stone);
    }

    #[test]
    fn test_tundra_snow_line() {
        assert_eq!(classify(0.0, 0.2, 0.5, Biome::Tundra), TerrainType::Snow);
        assert_eq!(classify(0.0, 0.6, 0.5, Biome::Tundra), TerrainType::Grass);
    }

    #[test]
    fn test_closure_classifier() {
        let all_stone = |_: usize, _: usize, _: f64, _: f64, _: f64, _: Biome, _: u64| TerrainType::Stone;
        assert_eq!(all_stone.classify(1, 2, 0.0, 0.0, 0.0, Biome::Plains, 9), TerrainType::Stone);
    }
}

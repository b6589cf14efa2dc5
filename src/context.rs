//! Generation parameters and per-channel noise derivation.

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeProfile};
use crate::error::GenerationError;
use crate::noise_field::{Channel, NoiseChannelConfig, NoiseField};

/// Immutable bundle of everything a generation run reads.
///
/// The engine only ever borrows a context; nothing is cached between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationContext {
    pub biome: Biome,
    pub seed: u64,

    /// Elevation frequency for biomes without their own elevation tuple
    pub elevation_frequency: f64,
    pub elevation_octaves: u32,
    pub temperature_frequency: f64,
    pub temperature_octaves: u32,
    pub moisture_frequency: f64,
    pub moisture_octaves: u32,

    pub stone_patch_frequency: f64,
    /// Normalized stone noise must exceed this (0.0-1.0)
    pub stone_threshold: f64,
    pub crystal_patch_frequency: f64,
    /// Normalized crystal noise must exceed this (0.0-1.0)
    pub crystal_threshold: f64,

    /// Base tree coverage before the biome multiplier
    pub tree_density: f64,
    /// 0 disables rivers and lakes entirely
    pub river_density: f64,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            biome: Biome::default(),
            seed: 0,
            elevation_frequency: 0.02,
            elevation_octaves: 6,
            temperature_frequency: 0.01,
            temperature_octaves: 3,
            moisture_frequency: 0.015,
            moisture_octaves: 4,
            stone_patch_frequency: 0.08,
            stone_threshold: 0.75,
            crystal_patch_frequency: 0.12,
            crystal_threshold: 0.85,
            tree_density: 0.3,
            river_density: 0.5,
        }
    }
}

impl GenerationContext {
    pub fn new(biome: Biome, seed: u64) -> Self {
        Self { biome, seed, ..Default::default() }
    }

    pub fn with_tree_density(mut self, density: f64) -> Self {
        self.tree_density = density;
        self
    }

    pub fn with_river_density(mut self, density: f64) -> Self {
        self.river_density = density;
        self
    }

    pub fn with_stone(mut self, frequency: f64, threshold: f64) -> Self {
        self.stone_patch_frequency = frequency;
        self.stone_threshold = threshold;
        self
    }

    pub fn with_crystal(mut self, frequency: f64, threshold: f64) -> Self {
        self.crystal_patch_frequency = frequency;
        self.crystal_threshold = threshold;
        self
    }

    pub fn profile(&self) -> &'static BiomeProfile {
        self.biome.profile()
    }

    /// Check every tunable is in range.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let frequencies = [
            ("elevation_frequency", self.elevation_frequency),
            ("temperature_frequency", self.temperature_frequency),
            ("moisture_frequency", self.moisture_frequency),
            ("stone_patch_frequency", self.stone_patch_frequency),
            ("crystal_patch_frequency", self.crystal_patch_frequency),
        ];
        for (name, value) in frequencies {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("must be a positive number, got {}", value)));
            }
        }

        for (name, value) in [("stone_threshold", self.stone_threshold), ("crystal_threshold", self.crystal_threshold)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(name, format!("must be within 0.0-1.0, got {}", value)));
            }
        }

        for (name, value) in [("tree_density", self.tree_density), ("river_density", self.river_density)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, format!("must be zero or positive, got {}", value)));
            }
        }

        Ok(())
    }

    /// Derive the six channel configurations for this context.
    pub fn channel_configs(&self) -> ChannelConfigs {
        let profile = self.profile();

        let elevation = match profile.elevation {
            Some(tuple) => NoiseChannelConfig {
                frequency: tuple.frequency,
                octaves: tuple.octaves,
                shape: tuple.shape,
                gain: tuple.gain,
                lacunarity: 2.0,
            },
            None => NoiseChannelConfig::fbm(self.elevation_frequency, self.elevation_octaves),
        };

        ChannelConfigs {
            elevation,
            temperature: NoiseChannelConfig::fbm(self.temperature_frequency, self.temperature_octaves),
            moisture: NoiseChannelConfig::fbm(self.moisture_frequency, self.moisture_octaves),
            stone: NoiseChannelConfig::plain(self.stone_patch_frequency),
            crystal: NoiseChannelConfig::plain(self.crystal_patch_frequency),
            tree: NoiseChannelConfig::plain(profile.tree_frequency),
        }
    }
}

fn invalid(name: &'static str, reason: String) -> GenerationError {
    GenerationError::InvalidParameter { name, reason }
}

/// One noise configuration per generation channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelConfigs {
    pub elevation: NoiseChannelConfig,
    pub temperature: NoiseChannelConfig,
    pub moisture: NoiseChannelConfig,
    pub stone: NoiseChannelConfig,
    pub crystal: NoiseChannelConfig,
    pub tree: NoiseChannelConfig,
}

impl ChannelConfigs {
    pub fn get(&self, channel: Channel) -> NoiseChannelConfig {
        match channel {
            Channel::Elevation => self.elevation,
            Channel::Temperature => self.temperature,
            Channel::Moisture => self.moisture,
            Channel::Stone => self.stone,
            Channel::Crystal => self.crystal,
            Channel::Tree => self.tree,
        }
    }

    /// Build the noise fields for a run seeded with `seed`.
    pub fn build_fields(&self, seed: u64) -> NoiseFields {
        let field = |channel| NoiseField::for_channel(seed, channel, self.get(channel));
        NoiseFields {
            elevation: field(Channel::Elevation),
            temperature: field(Channel::Temperature),
            moisture: field(Channel::Moisture),
            stone: field(Channel::Stone),
            crystal: field(Channel::Crystal),
            tree: field(Channel::Tree),
        }
    }
}

/// The six noise fields of a generation run.
#[derive(Clone, Debug)]
pub struct NoiseFields {
    pub elevation: NoiseField,
    pub temperature: NoiseField,
    pub moisture: NoiseField,
    pub stone: NoiseField,
    pub crystal: NoiseField,
    pub tree: NoiseField,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::FractalShape;

    #[test]
    fn test_biome_elevation_tuples() {
        let islands = GenerationContext::new(Biome::Islands, 1).channel_configs().elevation;
        assert_eq!((islands.frequency, islands.octaves, islands.shape), (0.005, 5, FractalShape::Fbm));

        let desert = GenerationContext::new(Biome::Desert, 1).channel_configs().elevation;
        assert_eq!((desert.frequency, desert.octaves, desert.shape, desert.gain), (0.04, 6, FractalShape::Ridged, 0.6));

        let mountains = GenerationContext::new(Biome::Mountainous, 1).channel_configs().elevation;
        assert_eq!(
            (mountains.frequency, mountains.octaves, mountains.shape, mountains.gain),
            (0.01, 8, FractalShape::Ridged, 0.7)
        );
    }

    #[test]
    fn test_default_elevation_uses_context_tunables() {
        let context = GenerationContext {
            elevation_frequency: 0.033,
            elevation_octaves: 3,
            ..GenerationContext::new(Biome::Plains, 1)
        };
        let elevation = context.channel_configs().elevation;
        assert_eq!(elevation, NoiseChannelConfig::fbm(0.033, 3));
    }

    #[test]
    fn test_climate_and_resource_channels() {
        let context = GenerationContext::new(Biome::Tundra, 1).with_stone(0.09, 0.7);
        let configs = context.channel_configs();

        assert_eq!(configs.temperature, NoiseChannelConfig::fbm(0.01, 3));
        assert_eq!(configs.moisture.gain, 0.5);
        assert_eq!(configs.moisture.lacunarity, 2.0);
        assert_eq!(configs.stone.octaves, 0);
        assert_eq!(configs.stone.frequency, 0.09);
        assert_eq!(configs.crystal.shape, FractalShape::Plain);
        assert_eq!(configs.tree.frequency, Biome::Tundra.profile().tree_frequency);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GenerationContext::default().validate().is_ok());

        let zero_freq = GenerationContext { moisture_frequency: 0.0, ..Default::default() };
        assert!(matches!(
            zero_freq.validate(),
            Err(GenerationError::InvalidParameter { name: "moisture_frequency", .. })
        ));

        let threshold = GenerationContext { crystal_threshold: 1.5, ..Default::default() };
        assert!(threshold.validate().is_err());

        let rivers = GenerationContext::default().with_river_density(-0.1);
        assert!(rivers.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "biome": "DARK_FOREST", "seed": 42, "river_density": 0.0 }"#;
        let context: GenerationContext = serde_json::from_str(json).unwrap();

        assert_eq!(context.biome, Biome::DarkForest);
        assert_eq!(context.seed, 42);
        assert_eq!(context.river_density, 0.0);
        assert_eq!(context.tree_density, GenerationContext::default().tree_density);
    }
}

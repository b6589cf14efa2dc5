//! Biome presets and the per-biome profile table.
//!
//! Every biome-conditional constant the generator needs (elevation noise
//! shape, tree channel frequency, tree density multiplier, water rules)
//! lives in one lookup table keyed by [`Biome`], built once on first use.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::noise_field::FractalShape;

/// Named preset of generation parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    #[default]
    Plains,
    Forest,
    DarkForest,
    Mediterranean,
    Desert,
    Tundra,
    Mountainous,
    Islands,
    Rivers,
}

impl Biome {
    pub fn all() -> &'static [Self] {
        &[
            Self::Plains,
            Self::Forest,
            Self::DarkForest,
            Self::Mediterranean,
            Self::Desert,
            Self::Tundra,
            Self::Mountainous,
            Self::Islands,
            Self::Rivers,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Plains => "Plains",
            Self::Forest => "Forest",
            Self::DarkForest => "Dark Forest",
            Self::Mediterranean => "Mediterranean",
            Self::Desert => "Desert",
            Self::Tundra => "Tundra",
            Self::Mountainous => "Mountainous",
            Self::Islands => "Islands",
            Self::Rivers => "Rivers",
        }
    }

    /// Canonical machine name, e.g. `DARK_FOREST`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plains => "PLAINS",
            Self::Forest => "FOREST",
            Self::DarkForest => "DARK_FOREST",
            Self::Mediterranean => "MEDITERRANEAN",
            Self::Desert => "DESERT",
            Self::Tundra => "TUNDRA",
            Self::Mountainous => "MOUNTAINOUS",
            Self::Islands => "ISLANDS",
            Self::Rivers => "RIVERS",
        }
    }

    /// Profile for this biome, falling back to [`BiomeProfile::DEFAULT`].
    pub fn profile(&self) -> &'static BiomeProfile {
        profile_table().get(self).unwrap_or(&BiomeProfile::DEFAULT)
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Biome {
    type Err = ConfigError;

    /// Accepts `DARK_FOREST`, `dark_forest`, `dark-forest` and `darkforest`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::all()
            .iter()
            .copied()
            .find(|biome| biome.name().replace('_', "") == wanted)
            .ok_or_else(|| ConfigError::UnknownBiome(s.to_string()))
    }
}

/// Elevation channel tuple for a biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationProfile {
    pub frequency: f64,
    pub octaves: u32,
    pub shape: FractalShape,
    pub gain: f64,
}

/// Which water-level rule set runs after the terrain pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaterRules {
    #[default]
    Base,
    Islands,
    Tundra,
    Rivers,
}

/// Everything biome-conditional about a generation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeProfile {
    /// `None` means "use the context's own elevation frequency/octaves".
    pub elevation: Option<ElevationProfile>,
    pub tree_frequency: f64,
    pub tree_density_multiplier: f64,
    /// Trees only grow on the oasis category (grass).
    pub trees_need_oasis: bool,
    /// Radial island falloff applied to elevation.
    pub island_shaping: bool,
    /// Lakes freeze over instead of filling with open water.
    pub frozen_lakes: bool,
    pub water_rules: WaterRules,
}

impl BiomeProfile {
    pub const DEFAULT: BiomeProfile = BiomeProfile {
        elevation: None,
        tree_frequency: 0.08,
        tree_density_multiplier: 1.0,
        trees_need_oasis: false,
        island_shaping: false,
        frozen_lakes: false,
        water_rules: WaterRules::Base,
    };
}

fn elevation(frequency: f64, octaves: u32, shape: FractalShape, gain: f64) -> Option<ElevationProfile> {
    Some(ElevationProfile { frequency, octaves, shape, gain })
}

fn profile_table() -> &'static HashMap<Biome, BiomeProfile> {
    static TABLE: OnceLock<HashMap<Biome, BiomeProfile>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let d = BiomeProfile::DEFAULT;
        HashMap::from([
            (Biome::Plains, d),
            (Biome::Forest, BiomeProfile { tree_frequency: 0.12, ..d }),
            (
                Biome::DarkForest,
                BiomeProfile {
                    elevation: elevation(0.02, 6, FractalShape::Fbm, 0.55),
                    tree_frequency: 0.15,
                    ..d
                },
            ),
            (
                Biome::Mediterranean,
                BiomeProfile {
                    elevation: elevation(0.012, 5, FractalShape::Fbm, 0.5),
                    tree_frequency: 0.12,
                    tree_density_multiplier: 1.8,
                    ..d
                },
            ),
            (
                Biome::Desert,
                BiomeProfile {
                    elevation: elevation(0.04, 6, FractalShape::Ridged, 0.6),
                    tree_frequency: 0.04,
                    tree_density_multiplier: 1.3,
                    trees_need_oasis: true,
                    ..d
                },
            ),
            (
                Biome::Tundra,
                BiomeProfile {
                    elevation: elevation(0.015, 5, FractalShape::Fbm, 0.5),
                    tree_frequency: 0.05,
                    tree_density_multiplier: 1.5,
                    frozen_lakes: true,
                    water_rules: WaterRules::Tundra,
                    ..d
                },
            ),
            (
                Biome::Mountainous,
                BiomeProfile {
                    elevation: elevation(0.01, 8, FractalShape::Ridged, 0.7),
                    tree_frequency: 0.06,
                    ..d
                },
            ),
            (
                Biome::Islands,
                BiomeProfile {
                    elevation: elevation(0.005, 5, FractalShape::Fbm, 0.5),
                    tree_frequency: 0.10,
                    tree_density_multiplier: 1.6,
                    island_shaping: true,
                    water_rules: WaterRules::Islands,
                    ..d
                },
            ),
            (
                Biome::Rivers,
                BiomeProfile {
                    elevation: elevation(0.008, 6, FractalShape::Fbm, 0.5),
                    tree_frequency: 0.10,
                    water_rules: WaterRules::Rivers,
                    ..d
                },
            ),
        ])
    })
}

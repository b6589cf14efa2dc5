//! Seeded fractal coherent noise.
//!
//! Each generation channel owns an independent [`NoiseField`] seeded with
//! `base_seed + channel offset`, so channels are uncorrelated but the whole
//! run stays reproducible from a single seed.

use noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};

/// How octave layers are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalShape {
    /// Single layer of base noise.
    Plain,
    /// Fractal Brownian motion: layers are summed.
    #[default]
    Fbm,
    /// Layers are folded around zero and inverted, producing sharp crests.
    Ridged,
}

/// Frequency and fractal settings for one noise channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseChannelConfig {
    /// Lattice-to-noise scale (lower = larger features)
    pub frequency: f64,
    /// Number of octave layers; 0 disables fractal summation
    pub octaves: u32,
    pub shape: FractalShape,
    /// Amplitude decay per octave
    pub gain: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl NoiseChannelConfig {
    /// Plain single-layer noise at `frequency`.
    pub fn plain(frequency: f64) -> Self {
        Self {
            frequency,
            octaves: 0,
            shape: FractalShape::Plain,
            gain: 0.5,
            lacunarity: 2.0,
        }
    }

    /// FBm with the standard gain 0.5 / lacunarity 2.0.
    pub fn fbm(frequency: f64, octaves: u32) -> Self {
        Self {
            frequency,
            octaves,
            shape: FractalShape::Fbm,
            gain: 0.5,
            lacunarity: 2.0,
        }
    }

    fn is_fractal(&self) -> bool {
        self.octaves > 0 && self.shape != FractalShape::Plain
    }
}

/// Noise purpose. The discriminant is the seed offset from the base seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Elevation = 0,
    Temperature = 1,
    Moisture = 2,
    Stone = 3,
    Crystal = 4,
    Tree = 5,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Elevation,
        Channel::Temperature,
        Channel::Moisture,
        Channel::Stone,
        Channel::Crystal,
        Channel::Tree,
    ];

    pub fn seed_offset(self) -> u64 {
        self as u64
    }

    /// Seed for this channel's field.
    pub fn seed(self, base_seed: u64) -> u64 {
        base_seed.wrapping_add(self.seed_offset())
    }
}

/// A seeded fractal noise sampler returning values in [-1, 1].
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise: OpenSimplex,
    config: NoiseChannelConfig,
}

impl NoiseField {
    pub fn new(seed: u64, config: NoiseChannelConfig) -> Self {
        Self {
            noise: OpenSimplex::new(fold_seed(seed)),
            config,
        }
    }

    /// Field for `channel`, seeded from the run's base seed.
    pub fn for_channel(base_seed: u64, channel: Channel, config: NoiseChannelConfig) -> Self {
        Self::new(channel.seed(base_seed), config)
    }

    /// Sample the field at a lattice coordinate.
    pub fn sample(&self, x: i64, y: i64) -> f64 {
        let x = x as f64 * self.config.frequency;
        let y = y as f64 * self.config.frequency;

        let value = if self.config.is_fractal() {
            self.fractal(x, y)
        } else {
            self.noise.get([x, y])
        };

        value.clamp(-1.0, 1.0)
    }

    /// Sample and remap from [-1, 1] to [0, 1].
    pub fn sample_normalized(&self, x: i64, y: i64) -> f64 {
        normalize(self.sample(x, y))
    }

    fn fractal(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            let n = self.noise.get([x * frequency, y * frequency]);
            let layer = match self.config.shape {
                FractalShape::Ridged => 1.0 - 2.0 * n.abs(),
                FractalShape::Fbm | FractalShape::Plain => n,
            };
            total += amplitude * layer;
            max_value += amplitude;
            amplitude *= self.config.gain;
            frequency *= self.config.lacunarity;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }
}

/// Remap a [-1, 1] noise value to [0, 1].
pub fn normalize(value: f64) -> f64 {
    (value + 1.0) / 2.0
}

/// `OpenSimplex` takes a 32-bit seed; mix the high half in so seeds that
/// differ only above bit 32 still produce different fields.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid(field: &NoiseField, size: i64) -> Vec<f64> {
        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| field.sample(x, y))
            .collect()
    }

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let config = NoiseChannelConfig::fbm(0.03, 5);
        let a = NoiseField::new(42, config);
        let b = NoiseField::new(42, config);

        assert_eq!(sample_grid(&a, 32), sample_grid(&b, 32));
    }

    #[test]
    fn test_channels_are_uncorrelated() {
        let config = NoiseChannelConfig::fbm(0.05, 4);
        let elevation = NoiseField::for_channel(7, Channel::Elevation, config);
        let moisture = NoiseField::for_channel(7, Channel::Moisture, config);

        let differing = sample_grid(&elevation, 16)
            .iter()
            .zip(sample_grid(&moisture, 16))
            .filter(|(a, b)| (*a - b).abs() > 1e-9)
            .count();
        assert!(differing > 200, "Only {} of 256 samples differ between channels", differing);
    }

    #[test]
    fn test_channel_seed_offsets() {
        let offsets: Vec<u64> = Channel::ALL.iter().map(|c| c.seed(100)).collect();
        assert_eq!(offsets, vec![100, 101, 102, 103, 104, 105]);
        assert_eq!(Channel::Tree.seed(u64::MAX), 4);
    }

    #[test]
    fn test_all_shapes_stay_in_range() {
        let configs = [
            NoiseChannelConfig::plain(0.1),
            NoiseChannelConfig::fbm(0.02, 8),
            NoiseChannelConfig {
                frequency: 0.04,
                octaves: 6,
                shape: FractalShape::Ridged,
                gain: 0.6,
                lacunarity: 2.0,
            },
        ];

        for config in configs {
            let field = NoiseField::new(3, config);
            for v in sample_grid(&field, 64) {
                assert!((-1.0..=1.0).contains(&v), "{:?} produced {}", config.shape, v);
                assert!((0.0..=1.0).contains(&normalize(v)));
            }
        }
    }

    #[test]
    fn test_zero_octaves_is_plain_noise() {
        let plain = NoiseField::new(9, NoiseChannelConfig::plain(0.07));
        let zero_octave_fbm = NoiseField::new(9, NoiseChannelConfig::fbm(0.07, 0));

        assert_eq!(sample_grid(&plain, 20), sample_grid(&zero_octave_fbm, 20));
    }

    #[test]
    fn test_ridged_differs_from_fbm() {
        let fbm = NoiseField::new(5, NoiseChannelConfig::fbm(0.04, 4));
        let ridged = NoiseField::new(
            5,
            NoiseChannelConfig {
                shape: FractalShape::Ridged,
                ..NoiseChannelConfig::fbm(0.04, 4)
            },
        );

        assert_ne!(sample_grid(&fbm, 16), sample_grid(&ridged, 16));
    }
}

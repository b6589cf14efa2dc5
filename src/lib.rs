//! Procedural terrain and hydrology generation library
//!
//! Re-exports modules for use by the binary and by embedding tools.

pub mod biome;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod hydrology;
pub mod noise_field;
pub mod resources;
pub mod terrain;
pub mod tilemap;
pub mod water_level;
pub mod world;

pub use biome::Biome;
pub use classify::{DefaultClassifier, TileClassifier};
pub use context::GenerationContext;
pub use error::{ConfigError, GenerationError};
pub use generator::{generate, generate_with};
pub use world::{Cell, Grid, Resource, TerrainType, World, WorldStats};

//! Terrain fields and biome classification

pub mod noise_field;
pub mod biome;

pub use noise_field::{NoiseField, NoiseParams};
pub use biome::{Biome, BiomePalette};

//! Terrain heights from fractal noise.
//!
//! **Seed-based determinism:** all noise is derived from `config.seed`, so the same seed
//! always produces the same ground height at every (x, y), whatever order it is sampled in.

use engine_core::GroundQuery;
use noise::{NoiseFn, Perlin, Simplex};
use serde::{Deserialize, Serialize};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for a noise heightfield.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height of the lowest possible ground.
    pub base_height: f32,
    /// Maximum height above `base_height`.
    pub height_scale: f32,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    pub seed: u64,
    /// Heights are floored to this grid when set (blocky terrain).
    pub voxel_size: Option<f32>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_height: 0.0,
            height_scale: 8.0,
            frequency: 0.02,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
            voxel_size: None,
        }
    }
}

/// Quantize height to voxel grid (floor to nearest voxel boundary).
#[inline]
pub fn quantize_height(z: f32, voxel_size: f32) -> f32 {
    (z / voxel_size).floor() * voxel_size
}

/// Ground sampled directly from noise; no mesh or heightmap is stored.
pub struct Heightfield {
    config: TerrainConfig,
    perlin: Perlin,
    simplex: Simplex,
}

impl Heightfield {
    pub fn new(config: TerrainConfig) -> Self {
        log::debug!(
            "Heightfield seed={} base={} scale={}",
            config.seed,
            config.base_height,
            config.height_scale
        );
        Self {
            perlin: Perlin::new(deterministic_noise_seed(config.seed, 0)),
            simplex: Simplex::new(deterministic_noise_seed(config.seed, 1)),
            config,
        }
    }

    /// Fractal noise normalized to 0-1.
    fn fractal_noise(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves.max(1) {
            // Mix Perlin and Simplex for variety
            let perlin_sample = self.perlin.get([x * frequency, y * frequency]);
            let simplex_sample = self.simplex.get([x * frequency + 1000.0, y * frequency + 1000.0]);

            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;

            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        ((value / max_value + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl GroundQuery for Heightfield {
    fn ground_height(&self, x: f32, y: f32) -> f32 {
        let n = self.fractal_noise(x as f64, y as f64) as f32;
        let mut z = self.config.base_height + n * self.config.height_scale;
        if let Some(vs) = self.config.voxel_size {
            z = quantize_height(z, vs);
        }
        z
    }
}

//! World-wide generation parameters.
//!
//! A `WorldConfig` is a read-only snapshot while generation is running:
//! the streaming layer hands the worker thread an `Arc<WorldConfig>` and
//! changing any field requires an explicit `regenerate()`.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::world::biome::BiomeMap;

/// Fractal layering applied on top of the base simplex noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalParams {
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

/// Serializable description of one coherent noise source.
///
/// The sampler itself is rebuilt from these fields on demand, so two
/// `NoiseParams` with equal fields always produce bit-identical values,
/// whether sampled in a batch or one point at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub seed: i32,
    pub frequency: f32,
    pub fractal: Option<FractalParams>,
}

impl NoiseParams {
    pub fn simplex(seed: i32, frequency: f32) -> Self {
        Self {
            seed,
            frequency,
            fractal: None,
        }
    }

    pub fn fbm(seed: i32, frequency: f32) -> Self {
        Self {
            seed,
            frequency,
            fractal: Some(FractalParams::default()),
        }
    }

    /// Build a configured sampler. Construction is plain field
    /// initialization, there is no table generation behind it.
    pub fn build(&self) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(self.seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(self.frequency));
        if let Some(fractal) = self.fractal {
            noise.set_fractal_type(Some(FractalType::FBm));
            noise.set_fractal_octaves(Some(fractal.octaves));
            noise.set_fractal_lacunarity(Some(fractal.lacunarity));
            noise.set_fractal_gain(Some(fractal.gain));
        }
        noise
    }

    /// Single-point convenience sampler, value in roughly [-1, 1].
    pub fn sample_2d(&self, x: f32, z: f32) -> f32 {
        self.build().get_noise_2d(x, z)
    }
}

/// Validated world-wide parameters. See `validate()` before generating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World extent in chunks; valid coordinates are `0..world_size` per axis.
    pub world_size: IVec2,
    /// Edge length of one chunk in world units.
    pub chunk_size: f32,
    /// Vertices per chunk edge. Must be at least 3.
    pub chunk_resolution: usize,
    /// Maximum terrain height in world units.
    pub height_scale: f32,
    /// Chebyshev radius (in chunks) in which colliders are kept alive.
    pub collision_radius: i32,
    /// Chebyshev radius (in chunks) in which chunks are streamed in.
    pub view_distance: i32,
    /// Ascending distance thresholds selecting coarser mesh LODs.
    pub lod_distances: Vec<f32>,
    /// Primary height noise. Generation is refused without it.
    pub noise: Option<NoiseParams>,
    /// Optional moisture noise; a uniform 0.5 field is used when absent.
    pub moisture_noise: Option<NoiseParams>,
    pub biomes: BiomeMap,
    /// Opaque handle to the terrain material, resolved by the render layer.
    pub terrain_material: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: IVec2::splat(DEFAULT_WORLD_SIZE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_resolution: DEFAULT_CHUNK_RESOLUTION,
            height_scale: DEFAULT_HEIGHT_SCALE,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            view_distance: DEFAULT_VIEW_DISTANCE,
            lod_distances: DEFAULT_LOD_DISTANCES.to_vec(),
            noise: Some(NoiseParams::fbm(1337, DEFAULT_TERRAIN_FREQUENCY)),
            moisture_noise: Some(NoiseParams::simplex(1338, DEFAULT_MOISTURE_FREQUENCY)),
            biomes: BiomeMap::standard(1337),
            terrain_material: None,
        }
    }
}

impl WorldConfig {
    /// Distance between adjacent grid vertices.
    pub fn cell_size(&self) -> f32 {
        self.chunk_size / (self.chunk_resolution - 1) as f32
    }

    /// Report every configuration problem as a human-readable string.
    /// An empty list means generation may proceed; nothing here panics.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.world_size.x <= 0 || self.world_size.y <= 0 {
            errors.push(format!(
                "world_size must be positive on both axes, got ({}, {})",
                self.world_size.x, self.world_size.y
            ));
        }
        if self.chunk_size <= 0.0 {
            errors.push(format!("chunk_size must be positive, got {}", self.chunk_size));
        }
        if self.chunk_resolution < MIN_CHUNK_RESOLUTION {
            errors.push(format!(
                "chunk_resolution must be at least {MIN_CHUNK_RESOLUTION}, got {}",
                self.chunk_resolution
            ));
        }
        if self.height_scale <= 0.0 {
            errors.push(format!(
                "height_scale must be positive, got {}",
                self.height_scale
            ));
        }
        if self.view_distance < 0 {
            errors.push(format!(
                "view_distance must not be negative, got {}",
                self.view_distance
            ));
        }
        if self.collision_radius < 0 {
            errors.push(format!(
                "collision_radius must not be negative, got {}",
                self.collision_radius
            ));
        }
        if self.noise.is_none() {
            errors.push("no primary noise source configured".to_string());
        }
        if self
            .lod_distances
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            errors.push("lod_distances must be strictly ascending".to_string());
        }

        errors
    }
}

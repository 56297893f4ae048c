//! Deterministic height and moisture sampling.
//!
//! Every function here is stateless: batch generation and single-point
//! sampling run the exact same arithmetic on the exact same absolute
//! world coordinates, so a grid-aligned `sample_height` call is
//! bit-identical to the matching `generate_height_data` entry.

use glam::IVec2;
use tracing::warn;

use crate::core::config::WorldConfig;

/// Sample the primary noise for a whole chunk, row-major.
/// Raw noise in [-1, 1] is remapped to [0, height_scale].
pub fn generate_height_data(coord: IVec2, config: &WorldConfig) -> Vec<f32> {
    let n = config.chunk_resolution;
    let mut heights = vec![0.0; n * n];

    let Some(params) = &config.noise else {
        warn!(?coord, "no primary noise source, generating flat terrain");
        return heights;
    };

    let noise = params.build();
    let cell = config.cell_size();
    let origin_x = coord.x as f32 * config.chunk_size;
    let origin_z = coord.y as f32 * config.chunk_size;

    for z in 0..n {
        let wz = origin_z + z as f32 * cell;
        for x in 0..n {
            let wx = origin_x + x as f32 * cell;
            let raw = noise.get_noise_2d(wx, wz);
            heights[z * n + x] = (raw + 1.0) * 0.5 * config.height_scale;
        }
    }
    heights
}

/// Sample the moisture noise for a whole chunk, values in [0, 1].
/// Falls back to a uniform 0.5 field when no moisture noise is configured.
pub fn generate_moisture_data(coord: IVec2, config: &WorldConfig) -> Vec<f32> {
    let n = config.chunk_resolution;

    let Some(params) = &config.moisture_noise else {
        warn!(?coord, "no moisture noise source, using uniform 0.5");
        return vec![0.5; n * n];
    };

    let noise = params.build();
    let cell = config.cell_size();
    let origin_x = coord.x as f32 * config.chunk_size;
    let origin_z = coord.y as f32 * config.chunk_size;

    let mut moisture = vec![0.0; n * n];
    for z in 0..n {
        let wz = origin_z + z as f32 * cell;
        for x in 0..n {
            let wx = origin_x + x as f32 * cell;
            let raw = noise.get_noise_2d(wx, wz);
            moisture[z * n + x] = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
        }
    }
    moisture
}

/// Single-point height sample at an absolute world position.
pub fn sample_height(world_x: f32, world_z: f32, config: &WorldConfig) -> f32 {
    match &config.noise {
        Some(params) => {
            let raw = params.build().get_noise_2d(world_x, world_z);
            (raw + 1.0) * 0.5 * config.height_scale
        }
        None => 0.0,
    }
}

/// Single-point moisture sample at an absolute world position.
pub fn sample_moisture(world_x: f32, world_z: f32, config: &WorldConfig) -> f32 {
    match &config.moisture_noise {
        Some(params) => {
            let raw = params.build().get_noise_2d(world_x, world_z);
            ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
        }
        None => 0.5,
    }
}

/// Height mapped back into [0, 1] for biome classification.
pub fn normalized_elevation(height: f32, config: &WorldConfig) -> f32 {
    if config.height_scale <= 0.0 {
        return 0.0;
    }
    (height / config.height_scale).clamp(0.0, 1.0)
}

//! The four-pass chunk generation pipeline.
//!
//! Pure data in, pure data out: this is the function the background
//! worker runs, so it must not touch anything but the read-only config.

use glam::IVec2;

use crate::core::chunk_data::{ChunkData, ChunkState};
use crate::core::config::WorldConfig;
use crate::world::{height, mesh};

/// Generate the complete payload for one chunk:
/// 1. base height and moisture fields,
/// 2. biome height blending,
/// 3. per-vertex biome splat weights,
/// 4. the LOD mesh chain.
pub fn generate_chunk_data(coord: IVec2, config: &WorldConfig) -> ChunkData {
    let n = config.chunk_resolution;
    let mut data = ChunkData::new(coord, n);
    data.state = ChunkState::Generating;

    // Pass 1: base fields
    data.height_data = height::generate_height_data(coord, config);
    data.moisture_data = height::generate_moisture_data(coord, config);

    let cell = config.cell_size();
    let origin_x = coord.x as f32 * config.chunk_size;
    let origin_z = coord.y as f32 * config.chunk_size;

    // Pass 2: per-vertex biome height blending
    for z in 0..n {
        let wz = origin_z + z as f32 * cell;
        for x in 0..n {
            let i = z * n + x;
            let elevation = height::normalized_elevation(data.height_data[i], config);
            let moisture = data.moisture_data[i];
            let wx = origin_x + x as f32 * cell;
            data.height_data[i] =
                config
                    .biomes
                    .blended_height(data.height_data[i], elevation, moisture, wx, wz);
        }
    }

    // Pass 3: splat weights from the blended heights
    for i in 0..n * n {
        let elevation = height::normalized_elevation(data.height_data[i], config);
        let weights = config.biomes.get_biome_weights(elevation, data.moisture_data[i]);
        data.biome_weights[i * 4..i * 4 + 4].copy_from_slice(&weights);
    }

    // Pass 4: LOD meshes
    let levels = config.lod_distances.len().max(1);
    data.mesh_lods = mesh::build_lod_meshes(&data.height_data, n, n, cell, levels);

    data.state = ChunkState::Ready;
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_chunk_is_ready_and_fully_populated() {
        let config = WorldConfig::default();
        let data = generate_chunk_data(IVec2::new(2, 3), &config);
        let n = config.chunk_resolution;
        assert_eq!(data.state, ChunkState::Ready);
        assert_eq!(data.height_data.len(), n * n);
        assert_eq!(data.moisture_data.len(), n * n);
        assert_eq!(data.biome_weights.len(), n * n * 4);
        assert_eq!(data.mesh_lods.len(), config.lod_distances.len());
    }

    #[test]
    fn generation_is_deterministic() {
        let config = WorldConfig::default();
        let a = generate_chunk_data(IVec2::new(-1, 4), &config);
        let b = generate_chunk_data(IVec2::new(-1, 4), &config);
        assert_eq!(a.height_data, b.height_data);
        assert_eq!(a.moisture_data, b.moisture_data);
        assert_eq!(a.biome_weights, b.biome_weights);
    }

    #[test]
    fn every_vertex_has_normalized_weights() {
        let config = WorldConfig::default();
        let data = generate_chunk_data(IVec2::ZERO, &config);
        for vertex in data.biome_weights.chunks_exact(4) {
            let sum: f32 = vertex.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
            assert!(vertex.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn mesh_vertices_follow_the_blended_heightfield() {
        let config = WorldConfig::default();
        let data = generate_chunk_data(IVec2::new(1, 1), &config);
        let full = &data.mesh_lods[0];
        for (i, position) in full.positions.iter().enumerate() {
            assert_eq!(position.y, data.height_data[i]);
        }
    }
}

//! Per-chunk generated payload.

use glam::IVec2;

use crate::world::mesh::MeshData;

/// Lifecycle of a chunk's generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkState {
    #[default]
    Pending,
    Generating,
    Ready,
}

/// Everything the generation pipeline produces for one chunk: height and
/// moisture fields, per-vertex 4-channel biome weights and the LOD mesh
/// chain (index 0 is the highest detail).
///
/// All grids are row-major `width * depth` with `width == depth ==
/// chunk_resolution`; `biome_weights` packs four floats per vertex.
#[derive(Debug, Clone, Default)]
pub struct ChunkData {
    pub coord: IVec2,
    pub width: usize,
    pub depth: usize,
    pub height_data: Vec<f32>,
    pub moisture_data: Vec<f32>,
    pub biome_weights: Vec<f32>,
    pub mesh_lods: Vec<MeshData>,
    pub state: ChunkState,
}

impl ChunkData {
    /// Allocate a zero-initialized payload for one chunk.
    pub fn new(coord: IVec2, resolution: usize) -> Self {
        let count = resolution * resolution;
        Self {
            coord,
            width: resolution,
            depth: resolution,
            height_data: vec![0.0; count],
            moisture_data: vec![0.0; count],
            biome_weights: vec![0.0; count * 4],
            mesh_lods: Vec::new(),
            state: ChunkState::Pending,
        }
    }

    /// Reset for pool reuse, keeping allocations where the resolution allows.
    pub fn clear(&mut self, coord: IVec2, resolution: usize) {
        let count = resolution * resolution;
        self.coord = coord;
        self.width = resolution;
        self.depth = resolution;
        self.height_data.clear();
        self.height_data.resize(count, 0.0);
        self.moisture_data.clear();
        self.moisture_data.resize(count, 0.0);
        self.biome_weights.clear();
        self.biome_weights.resize(count * 4, 0.0);
        self.mesh_lods.clear();
        self.state = ChunkState::Pending;
    }

    #[inline]
    pub fn idx(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    #[inline]
    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        self.height_data[self.idx(x, z)]
    }

    /// Bilinear height lookup at a chunk-local position in world units.
    /// Positions outside the chunk are clamped to the border.
    pub fn sample_height(&self, local_x: f32, local_z: f32, cell_size: f32) -> f32 {
        let gx = (local_x / cell_size).clamp(0.0, (self.width - 1) as f32);
        let gz = (local_z / cell_size).clamp(0.0, (self.depth - 1) as f32);
        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;

        let h00 = self.height_at(x0, z0);
        let h10 = self.height_at(x1, z0);
        let h01 = self.height_at(x0, z1);
        let h11 = self.height_at(x1, z1);

        let bottom = h00 + (h10 - h00) * tx;
        let top = h01 + (h11 - h01) * tx;
        bottom + (top - bottom) * tz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_zeroed_and_pending() {
        let data = ChunkData::new(IVec2::new(2, -1), 5);
        assert_eq!(data.state, ChunkState::Pending);
        assert_eq!(data.height_data.len(), 25);
        assert_eq!(data.biome_weights.len(), 100);
        assert!(data.height_data.iter().all(|&h| h == 0.0));
        assert!(data.mesh_lods.is_empty());
    }

    #[test]
    fn clear_resets_state_for_reuse() {
        let mut data = ChunkData::new(IVec2::ZERO, 5);
        data.height_data[7] = 3.0;
        data.state = ChunkState::Ready;
        data.clear(IVec2::new(1, 1), 5);
        assert_eq!(data.coord, IVec2::new(1, 1));
        assert_eq!(data.state, ChunkState::Pending);
        assert!(data.height_data.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn bilinear_sample_matches_grid_and_midpoints() {
        let mut data = ChunkData::new(IVec2::ZERO, 3);
        // heights form a ramp along x: 0, 1, 2 on every row
        for z in 0..3 {
            for x in 0..3 {
                data.height_data[z * 3 + x] = x as f32;
            }
        }
        let cell = 2.0;
        assert_eq!(data.sample_height(0.0, 0.0, cell), 0.0);
        assert_eq!(data.sample_height(2.0, 2.0, cell), 1.0);
        assert_eq!(data.sample_height(1.0, 0.0, cell), 0.5);
        // clamped outside the chunk
        assert_eq!(data.sample_height(100.0, 0.0, cell), 2.0);
        assert_eq!(data.sample_height(-5.0, 0.0, cell), 0.0);
    }
}

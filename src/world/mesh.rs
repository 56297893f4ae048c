//! Heightfield triangulation and LOD chain construction.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// CPU-side mesh payload handed to whatever render layer sits on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Triangulate a row-major heightfield into a smooth-shaded mesh.
///
/// Vertices sit at `(x * cell_size, height, z * cell_size)` with UVs at the
/// fractional grid position. Triangles wind counter-clockwise seen from
/// above so the surface faces +Y. Normals are area-weighted: every
/// triangle's non-normalized cross product is accumulated onto its three
/// vertices before per-vertex normalization; a degenerate sum falls back
/// to straight up.
pub fn build_mesh(heights: &[f32], width: usize, depth: usize, cell_size: f32) -> MeshData {
    debug_assert_eq!(heights.len(), width * depth);

    let mut positions = Vec::with_capacity(width * depth);
    let mut uvs = Vec::with_capacity(width * depth);
    for z in 0..depth {
        for x in 0..width {
            positions.push(Vec3::new(
                x as f32 * cell_size,
                heights[z * width + x],
                z as f32 * cell_size,
            ));
            uvs.push(Vec2::new(
                x as f32 / (width - 1) as f32,
                z as f32 / (depth - 1) as f32,
            ));
        }
    }

    let mut indices = Vec::with_capacity(6 * (width - 1) * (depth - 1));
    for z in 0..depth - 1 {
        for x in 0..width - 1 {
            let i0 = (z * width + x) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + width as u32;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    for normal in &mut normals {
        *normal = normal.try_normalize().unwrap_or(Vec3::Y);
    }

    MeshData {
        positions,
        normals,
        uvs,
        indices,
    }
}

/// Halve a heightfield with an edge-clamped 2x2 box filter.
/// Output dims are `ceil(dim / 2)`, which is strictly smaller for dims > 1.
pub fn downsample(heights: &[f32], width: usize, depth: usize) -> (Vec<f32>, usize, usize) {
    let new_width = width.div_ceil(2);
    let new_depth = depth.div_ceil(2);
    let mut out = Vec::with_capacity(new_width * new_depth);

    for z in 0..new_depth {
        for x in 0..new_width {
            let x0 = (x * 2).min(width - 1);
            let x1 = (x * 2 + 1).min(width - 1);
            let z0 = (z * 2).min(depth - 1);
            let z1 = (z * 2 + 1).min(depth - 1);
            let sum = heights[z0 * width + x0]
                + heights[z0 * width + x1]
                + heights[z1 * width + x0]
                + heights[z1 * width + x1];
            out.push(sum * 0.25);
        }
    }
    (out, new_width, new_depth)
}

/// Build the LOD chain for one chunk. Level 0 is full resolution; every
/// following level is box-filtered to half the grid dims with doubled cell
/// size. The chain stops early once either dimension would drop below 3,
/// and never exceeds `levels` entries.
pub fn build_lod_meshes(
    heights: &[f32],
    width: usize,
    depth: usize,
    cell_size: f32,
    levels: usize,
) -> Vec<MeshData> {
    let mut lods = Vec::with_capacity(levels);
    if levels == 0 {
        return lods;
    }
    lods.push(build_mesh(heights, width, depth, cell_size));

    let mut current = heights.to_vec();
    let mut w = width;
    let mut d = depth;
    let mut cell = cell_size;
    while lods.len() < levels {
        if w.div_ceil(2) < 3 || d.div_ceil(2) < 3 {
            break;
        }
        let (next, nw, nd) = downsample(&current, w, d);
        cell *= 2.0;
        lods.push(build_mesh(&next, nw, nd, cell));
        current = next;
        w = nw;
        d = nd;
    }
    lods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_counts_match_grid() {
        let heights = vec![0.0; 5 * 5];
        let mesh = build_mesh(&heights, 5, 5, 1.0);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.normals.len(), 25);
        assert_eq!(mesh.uvs.len(), 25);
        assert_eq!(mesh.triangle_count(), 2 * 4 * 4);
    }

    #[test]
    fn flat_field_has_straight_up_normals() {
        let heights = vec![0.0; 7 * 7];
        let mesh = build_mesh(&heights, 7, 7, 2.0);
        assert!(mesh.positions.iter().all(|p| p.y == 0.0));
        assert!(mesh.normals.iter().all(|&n| n == Vec3::Y));
    }

    #[test]
    fn winding_faces_upward() {
        let heights = vec![0.0; 3 * 3];
        let mesh = build_mesh(&heights, 3, 3, 1.0);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (mesh.positions[b] - mesh.positions[a])
                .cross(mesh.positions[c] - mesh.positions[a]);
            assert!(face.y > 0.0);
        }
    }

    #[test]
    fn uvs_cover_unit_square() {
        let heights = vec![0.0; 4 * 4];
        let mesh = build_mesh(&heights, 4, 4, 1.0);
        assert_eq!(mesh.uvs[0], Vec2::ZERO);
        assert_eq!(mesh.uvs[15], Vec2::ONE);
    }

    #[test]
    fn downsample_averages_quads() {
        // 4x4 ramp along x
        let heights: Vec<f32> = (0..16).map(|i| (i % 4) as f32).collect();
        let (out, w, d) = downsample(&heights, 4, 4);
        assert_eq!((w, d), (2, 2));
        assert_eq!(out, vec![0.5, 2.5, 0.5, 2.5]);
    }

    #[test]
    fn lod_chain_reduces_triangles_monotonically() {
        let heights = vec![1.0; 33 * 33];
        let lods = build_lod_meshes(&heights, 33, 33, 1.0, 4);
        assert_eq!(lods.len(), 4);
        for pair in lods.windows(2) {
            assert!(pair[1].triangle_count() * 3 <= pair[0].triangle_count());
        }
    }

    #[test]
    fn lod_chain_stops_before_degenerate_grids() {
        let heights = vec![0.0; 5 * 5];
        // 5 -> 3, then 3 would become 2: stop
        let lods = build_lod_meshes(&heights, 5, 5, 1.0, 8);
        assert_eq!(lods.len(), 2);
        assert_eq!(lods[1].vertex_count(), 9);
    }

    #[test]
    fn lod_chain_respects_requested_levels() {
        let heights = vec![0.0; 65 * 65];
        assert_eq!(build_lod_meshes(&heights, 65, 65, 1.0, 2).len(), 2);
        assert_eq!(build_lod_meshes(&heights, 65, 65, 1.0, 1).len(), 1);
        assert!(build_lod_meshes(&heights, 65, 65, 1.0, 0).is_empty());
    }

    #[test]
    fn coarser_lods_keep_world_extent() {
        let heights = vec![0.0; 33 * 33];
        let lods = build_lod_meshes(&heights, 33, 33, 1.0, 3);
        for lod in &lods {
            let max_x = lod
                .positions
                .iter()
                .map(|p| p.x)
                .fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(max_x, 32.0);
        }
    }
}

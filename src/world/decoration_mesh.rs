//! Procedural placeholder meshes for decorations without authored assets.
//!
//! Blocky stand-ins assembled from axis-aligned boxes, one mesh per
//! variant so batching still works before real assets arrive. Origin is
//! at the base of each mesh; sizes are in world units around 1.

use glam::{Vec2, Vec3};

use crate::constants::PLACEHOLDER_VARIANTS;
use crate::world::mesh::MeshData;
use crate::world::vegetation::DecorationKind;

/// All placeholder variants for one decoration kind.
pub fn placeholder_variants(kind: DecorationKind) -> Vec<MeshData> {
    (0..PLACEHOLDER_VARIANTS)
        .map(|variant| match kind {
            DecorationKind::Tree => build_tree(variant),
            DecorationKind::Rock => build_rock(variant),
            DecorationKind::Bush => build_bush(variant),
        })
        .collect()
}

/// Trunk plus a tapering stack of canopy boxes.
pub fn build_tree(variant: usize) -> MeshData {
    let mut mesh = MeshData::default();
    let trunk_height = 1.6 + 0.3 * variant as f32;
    let canopy_base = 0.9 + 0.15 * variant as f32;

    push_box(
        &mut mesh,
        Vec3::new(0.0, trunk_height * 0.5, 0.0),
        Vec3::new(0.12, trunk_height * 0.5, 0.12),
    );
    let mut level_half = canopy_base * 0.5;
    let mut level_y = trunk_height;
    for _ in 0..3 {
        push_box(
            &mut mesh,
            Vec3::new(0.0, level_y + level_half * 0.6, 0.0),
            Vec3::new(level_half, level_half * 0.6, level_half),
        );
        level_y += level_half;
        level_half *= 0.65;
    }
    mesh
}

/// Two offset boxes with variant-dependent proportions.
pub fn build_rock(variant: usize) -> MeshData {
    let mut mesh = MeshData::default();
    let stretch = 1.0 + 0.25 * variant as f32;
    push_box(
        &mut mesh,
        Vec3::new(0.0, 0.25, 0.0),
        Vec3::new(0.45 * stretch, 0.25, 0.35),
    );
    push_box(
        &mut mesh,
        Vec3::new(0.15, 0.45, -0.1),
        Vec3::new(0.25, 0.2, 0.2 * stretch),
    );
    mesh
}

/// A squat leafy blob.
pub fn build_bush(variant: usize) -> MeshData {
    let mut mesh = MeshData::default();
    let spread = 0.35 + 0.08 * variant as f32;
    push_box(
        &mut mesh,
        Vec3::new(0.0, 0.25, 0.0),
        Vec3::new(spread, 0.25, spread),
    );
    push_box(
        &mut mesh,
        Vec3::new(0.0, 0.55, 0.0),
        Vec3::new(spread * 0.6, 0.15, spread * 0.6),
    );
    mesh
}

/// Append an axis-aligned box as six flat-shaded quads.
fn push_box(mesh: &mut MeshData, center: Vec3, half: Vec3) {
    let corners = [
        center + Vec3::new(-half.x, -half.y, -half.z),
        center + Vec3::new(half.x, -half.y, -half.z),
        center + Vec3::new(half.x, half.y, -half.z),
        center + Vec3::new(-half.x, half.y, -half.z),
        center + Vec3::new(-half.x, -half.y, half.z),
        center + Vec3::new(half.x, -half.y, half.z),
        center + Vec3::new(half.x, half.y, half.z),
        center + Vec3::new(-half.x, half.y, half.z),
    ];

    let faces: [([usize; 4], Vec3); 6] = [
        ([4, 5, 6, 7], Vec3::Z),
        ([1, 0, 3, 2], Vec3::NEG_Z),
        ([5, 1, 2, 6], Vec3::X),
        ([0, 4, 7, 3], Vec3::NEG_X),
        ([7, 6, 2, 3], Vec3::Y),
        ([0, 1, 5, 4], Vec3::NEG_Y),
    ];

    for (face, normal) in faces {
        let base = mesh.positions.len() as u32;
        for index in face {
            mesh.positions.push(corners[index]);
            mesh.normals.push(normal);
            mesh.uvs.push(Vec2::ZERO);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

//! Vegetation and prop placement.
//!
//! For each active chunk the spawner picks the dominant biome's
//! decoration list, scatters candidate points (jittered grid or Bridson
//! Poisson disk), filters them against terrain constraints and emits one
//! batch of instance transforms per mesh variant. Placement is seeded
//! from `(global_seed, chunk coord)` so a world always grows back the
//! same forest.

use std::f32::consts::TAU;

use glam::{IVec2, Mat4, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_INSTANCES_PER_CHUNK, PLACEHOLDER_VARIANTS, POISSON_ATTEMPTS};
use crate::core::config::{NoiseParams, WorldConfig};
use crate::world::decoration_mesh;
use crate::world::height;
use crate::world::manager::TerrainChunk;
use crate::world::mesh::MeshData;

/// Selects the placeholder mesh family when no authored variants are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationKind {
    Tree,
    Rock,
    Bush,
}

/// Clustering noise carves organic gaps into the placement field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    pub noise: NoiseParams,
    /// Candidates below this noise value (remapped to [0, 1]) are dropped.
    pub threshold: f32,
    /// How strongly scale shrinks toward cluster boundaries, 0..=1.
    pub edge_falloff: f32,
}

/// Placement policy for one decoration type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorationDefinition {
    pub name: String,
    pub kind: DecorationKind,
    /// Approximate instances per square world unit; spacing is
    /// `1 / sqrt(density)`.
    pub density: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub uniform_scale: bool,
    /// Allowed terrain slope in degrees, `min_slope <= max_slope`.
    pub min_slope: f32,
    pub max_slope: f32,
    /// Maximum random lean in degrees, 0 disables.
    pub random_tilt: f32,
    pub align_to_normal: bool,
    /// Clamp for normal alignment, degrees from vertical.
    pub max_align_angle: f32,
    pub clustering: Option<ClusterParams>,
    pub use_poisson: bool,
    pub with_collision: bool,
    pub max_instances: usize,
    /// Authored variant meshes; placeholders are built when empty.
    #[serde(skip)]
    pub variant_meshes: Vec<MeshData>,
}

impl DecorationDefinition {
    pub fn new(name: &str, kind: DecorationKind, density: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            density,
            min_scale: 0.8,
            max_scale: 1.2,
            uniform_scale: true,
            min_slope: 0.0,
            max_slope: 35.0,
            random_tilt: 0.0,
            align_to_normal: false,
            max_align_angle: 25.0,
            clustering: None,
            use_poisson: false,
            with_collision: false,
            max_instances: MAX_INSTANCES_PER_CHUNK,
            variant_meshes: Vec::new(),
        }
    }

    pub fn tree() -> Self {
        DecorationDefinition::new("tree", DecorationKind::Tree, 0.01)
            .with_scale_range(0.7, 1.4)
            .with_slope_range(0.0, 30.0)
            .with_clustering(ClusterParams {
                noise: NoiseParams::simplex(9001, 0.01),
                threshold: 0.45,
                edge_falloff: 0.5,
            })
            .with_poisson(true)
            .with_collision(true)
    }

    pub fn rock() -> Self {
        let mut def = DecorationDefinition::new("rock", DecorationKind::Rock, 0.004)
            .with_scale_range(0.5, 1.8)
            .with_slope_range(0.0, 60.0)
            .with_collision(true);
        def.uniform_scale = false;
        def.align_to_normal = true;
        def.max_align_angle = 40.0;
        def
    }

    pub fn grass_bush() -> Self {
        let mut def = DecorationDefinition::new("bush", DecorationKind::Bush, 0.05)
            .with_scale_range(0.6, 1.1)
            .with_slope_range(0.0, 40.0);
        def.random_tilt = 8.0;
        def
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.min_scale = min;
        self.max_scale = max.max(min);
        self
    }

    /// Slope bounds in degrees; `max` is raised to `min` when inverted.
    pub fn with_slope_range(mut self, min: f32, max: f32) -> Self {
        self.min_slope = min;
        self.max_slope = max.max(min);
        self
    }

    pub fn with_clustering(mut self, clustering: ClusterParams) -> Self {
        self.clustering = Some(clustering);
        self
    }

    pub fn with_poisson(mut self, poisson: bool) -> Self {
        self.use_poisson = poisson;
        self
    }

    pub fn with_collision(mut self, collision: bool) -> Self {
        self.with_collision = collision;
        self
    }

    pub fn with_variant_meshes(mut self, meshes: Vec<MeshData>) -> Self {
        self.variant_meshes = meshes;
        self
    }

    /// Target spacing between instances.
    pub fn min_distance(&self) -> f32 {
        if self.density <= 0.0 {
            return f32::MAX;
        }
        1.0 / self.density.sqrt()
    }

    /// Number of mesh variants instances are distributed over.
    pub fn variant_count(&self) -> usize {
        if self.variant_meshes.is_empty() {
            PLACEHOLDER_VARIANTS
        } else {
            self.variant_meshes.len()
        }
    }
}

/// All transforms for one (decoration, mesh variant) pair; the render
/// layer turns each batch into one instanced draw.
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    pub decoration: String,
    pub kind: DecorationKind,
    pub variant: usize,
    pub transforms: Vec<Mat4>,
}

/// Placement output for one chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkVegetation {
    pub coord: IVec2,
    pub batches: Vec<InstanceBatch>,
    /// World positions that get individual collision volumes, limited to
    /// the spawner's collider distance around the observer.
    pub colliders: Vec<Vec3>,
}

impl ChunkVegetation {
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(|b| b.transforms.len()).sum()
    }
}

/// Samples placement points and builds per-variant instance batches.
pub struct VegetationSpawner {
    pub global_seed: u32,
    /// Decoration colliders spawn only within this distance of the observer.
    pub collider_distance: f32,
    /// Used when the dominant biome carries no decoration list.
    pub default_decorations: Vec<DecorationDefinition>,
    mesh_cache: FxHashMap<String, Vec<MeshData>>,
}

impl VegetationSpawner {
    pub fn new(global_seed: u32, collider_distance: f32) -> Self {
        Self {
            global_seed,
            collider_distance,
            default_decorations: Vec::new(),
            mesh_cache: FxHashMap::default(),
        }
    }

    /// The mesh for one variant of a decoration: authored when supplied,
    /// otherwise a cached procedural placeholder.
    pub fn variant_mesh<'a>(
        &'a mut self,
        def: &'a DecorationDefinition,
        variant: usize,
    ) -> Option<&'a MeshData> {
        if !def.variant_meshes.is_empty() {
            return def.variant_meshes.get(variant);
        }
        self.mesh_cache
            .entry(def.name.clone())
            .or_insert_with(|| decoration_mesh::placeholder_variants(def.kind))
            .get(variant)
    }

    /// Place every decoration of the chunk's dominant biome.
    pub fn spawn_chunk(
        &self,
        chunk: &TerrainChunk,
        config: &WorldConfig,
        observer_pos: Vec3,
    ) -> ChunkVegetation {
        let data = &chunk.data;
        let cell = config.cell_size();
        let extent = config.chunk_size;

        // Dominant biome at the chunk center decides what grows here.
        let center = extent * 0.5;
        let center_height = data.sample_height(center, center, cell);
        let elevation = height::normalized_elevation(center_height, config);
        let mid = data.width / 2;
        let moisture = data.moisture_data[mid * data.width + mid];
        let decorations: &[DecorationDefinition] = match config.biomes.get_biome(elevation, moisture)
        {
            Some(biome) if !biome.decorations.is_empty() => &biome.decorations,
            _ => &self.default_decorations,
        };

        let mut result = ChunkVegetation {
            coord: chunk.coord,
            ..ChunkVegetation::default()
        };
        let mut total_instances = 0usize;

        for (decoration_index, def) in decorations.iter().enumerate() {
            let spacing = def.min_distance();
            if !spacing.is_finite() || spacing > extent {
                continue;
            }
            let mut rng = StdRng::seed_from_u64(
                chunk_seed(self.global_seed, chunk.coord)
                    ^ (decoration_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            );

            let points = if def.use_poisson {
                poisson_disk(&mut rng, extent, spacing, spacing)
            } else {
                jittered_grid(&mut rng, extent, spacing)
            };

            let mut variants: Vec<Vec<Mat4>> = vec![Vec::new(); def.variant_count()];
            let mut placed = 0usize;

            for point in points {
                if placed >= def.max_instances || total_instances >= MAX_INSTANCES_PER_CHUNK {
                    break;
                }

                let world_x = chunk.origin.x + point.x;
                let world_z = chunk.origin.z + point.y;

                // Clustering gate, with scale shrinking toward gap edges.
                let mut cluster_scale = 1.0;
                if let Some(cluster) = &def.clustering {
                    let value = (cluster.noise.sample_2d(world_x, world_z) + 1.0) * 0.5;
                    if value < cluster.threshold {
                        continue;
                    }
                    let span = (1.0 - cluster.threshold).max(f32::EPSILON);
                    let edge = ((value - cluster.threshold) / span).clamp(0.0, 1.0);
                    cluster_scale = 1.0 - cluster.edge_falloff * (1.0 - edge);
                }

                let (slope, normal) = slope_at(data, point, cell);
                if slope < def.min_slope || slope > def.max_slope {
                    continue;
                }

                let surface = data.sample_height(point.x, point.y, cell);
                let position = chunk.origin + Vec3::new(point.x, surface, point.y);

                let base_scale = rng.random_range(def.min_scale..=def.max_scale) * cluster_scale;
                let scale = if def.uniform_scale {
                    Vec3::splat(base_scale)
                } else {
                    Vec3::new(
                        base_scale * rng.random_range(0.85..=1.15),
                        base_scale,
                        base_scale * rng.random_range(0.85..=1.15),
                    )
                };

                let mut rotation = Quat::from_rotation_y(rng.random_range(0.0..TAU));
                if def.random_tilt > 0.0 {
                    let axis_angle = rng.random_range(0.0..TAU);
                    let axis = Vec3::new(axis_angle.cos(), 0.0, axis_angle.sin());
                    let tilt = rng.random_range(0.0..=def.random_tilt.to_radians());
                    rotation = Quat::from_axis_angle(axis, tilt) * rotation;
                }
                if def.align_to_normal {
                    rotation = clamped_alignment(normal, def.max_align_angle) * rotation;
                }

                let variant = rng.random_range(0..variants.len());
                variants[variant].push(Mat4::from_scale_rotation_translation(
                    scale, rotation, position,
                ));
                placed += 1;
                total_instances += 1;

                if def.with_collision && position.distance(observer_pos) <= self.collider_distance
                {
                    result.colliders.push(position);
                }
            }

            for (variant, transforms) in variants.into_iter().enumerate() {
                if !transforms.is_empty() {
                    result.batches.push(InstanceBatch {
                        decoration: def.name.clone(),
                        kind: def.kind,
                        variant,
                        transforms,
                    });
                }
            }
        }

        result
    }
}

/// Deterministic per-chunk seed, mixing the world seed with the chunk
/// coordinate the same way the height hash does.
fn chunk_seed(global_seed: u32, coord: IVec2) -> u64 {
    let mut hash = global_seed;
    hash = hash.wrapping_add(coord.x as u32).wrapping_mul(73_856_093);
    hash = hash.wrapping_add(coord.y as u32).wrapping_mul(19_349_663);
    let mixed = hash ^ (hash >> 16);
    ((mixed as u64) << 32) | global_seed as u64
}

/// Central-difference slope (degrees from horizontal) and surface normal
/// at a chunk-local point; samples clamp at the chunk border.
fn slope_at(data: &crate::core::chunk_data::ChunkData, point: Vec2, cell: f32) -> (f32, Vec3) {
    let step = cell;
    let hx0 = data.sample_height(point.x - step, point.y, cell);
    let hx1 = data.sample_height(point.x + step, point.y, cell);
    let hz0 = data.sample_height(point.x, point.y - step, cell);
    let hz1 = data.sample_height(point.x, point.y + step, cell);
    let dhdx = (hx1 - hx0) / (2.0 * step);
    let dhdz = (hz1 - hz0) / (2.0 * step);
    let normal = Vec3::new(-dhdx, 1.0, -dhdz).normalize();
    let slope = normal.y.clamp(-1.0, 1.0).acos().to_degrees();
    (slope, normal)
}

/// Rotation from +Y to the surface normal, limited to `max_degrees`.
fn clamped_alignment(normal: Vec3, max_degrees: f32) -> Quat {
    let full = Quat::from_rotation_arc(Vec3::Y, normal);
    let angle = Vec3::Y.angle_between(normal);
    let max = max_degrees.to_radians();
    if angle <= max || angle <= f32::EPSILON {
        full
    } else {
        Quat::IDENTITY.slerp(full, max / angle)
    }
}

/// One jittered sample per grid cell across `[0, extent)^2`.
pub fn jittered_grid(rng: &mut StdRng, extent: f32, min_dist: f32) -> Vec<Vec2> {
    let cells = (extent / min_dist).floor().max(1.0) as usize;
    let cell = extent / cells as f32;
    // a jitter draw right below 1.0 can round onto the far border
    let limit = extent * (1.0 - 2.0 * f32::EPSILON);
    let mut points = Vec::with_capacity(cells * cells);
    for cz in 0..cells {
        for cx in 0..cells {
            points.push(Vec2::new(
                ((cx as f32 + rng.random_range(0.0..1.0)) * cell).min(limit),
                ((cz as f32 + rng.random_range(0.0..1.0)) * cell).min(limit),
            ));
        }
    }
    points
}

/// Bridson's Poisson-disk sampling over a margin-expanded square, clipped
/// back to `[0, extent)^2` so chunk borders show no edge artifacts. Uses
/// a uniform grid sized `min_dist / sqrt(2)` for O(1) neighbor checks and
/// a bounded number of attempts per active point.
pub fn poisson_disk(rng: &mut StdRng, extent: f32, min_dist: f32, margin: f32) -> Vec<Vec2> {
    let size = extent + 2.0 * margin;
    let cell = min_dist / std::f32::consts::SQRT_2;
    let grid_dim = (size / cell).ceil() as usize + 1;
    let mut grid: Vec<Option<usize>> = vec![None; grid_dim * grid_dim];
    let mut points: Vec<Vec2> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let grid_index = |p: Vec2| -> (usize, usize) {
        (
            ((p.x / cell) as usize).min(grid_dim - 1),
            ((p.y / cell) as usize).min(grid_dim - 1),
        )
    };

    let first = Vec2::new(
        rng.random_range(0.0..size),
        rng.random_range(0.0..size),
    );
    let (gx, gy) = grid_index(first);
    grid[gy * grid_dim + gx] = Some(0);
    points.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.random_range(0..active.len());
        let base = points[active[slot]];
        let mut placed = false;

        for _ in 0..POISSON_ATTEMPTS {
            let angle = rng.random_range(0.0..TAU);
            let radius = min_dist * (1.0 + rng.random_range(0.0..1.0));
            let candidate = base + Vec2::from_angle(angle) * radius;
            if candidate.x < 0.0 || candidate.y < 0.0 || candidate.x >= size || candidate.y >= size
            {
                continue;
            }

            let (cgx, cgy) = grid_index(candidate);
            let mut too_close = false;
            'neighbors: for ny in cgy.saturating_sub(2)..=(cgy + 2).min(grid_dim - 1) {
                for nx in cgx.saturating_sub(2)..=(cgx + 2).min(grid_dim - 1) {
                    if let Some(index) = grid[ny * grid_dim + nx] {
                        if points[index].distance(candidate) < min_dist {
                            too_close = true;
                            break 'neighbors;
                        }
                    }
                }
            }
            if too_close {
                continue;
            }

            let index = points.len();
            points.push(candidate);
            grid[cgy * grid_dim + cgx] = Some(index);
            active.push(index);
            placed = true;
            break;
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points
        .into_iter()
        .map(|p| p - Vec2::splat(margin))
        .filter(|p| p.x >= 0.0 && p.y >= 0.0 && p.x < extent && p.y < extent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator;

    fn flat_chunk(config: &WorldConfig) -> TerrainChunk {
        // No noise source: heights are exactly zero everywhere.
        let flat_config = WorldConfig {
            noise: None,
            ..config.clone()
        };
        let data = generator::generate_chunk_data(IVec2::ZERO, &flat_config);
        TerrainChunk::from_data(IVec2::ZERO, Vec3::ZERO, data)
    }

    fn ramp_chunk(config: &WorldConfig, rise_per_cell: f32) -> TerrainChunk {
        let n = config.chunk_resolution;
        let mut data = crate::core::chunk_data::ChunkData::new(IVec2::ZERO, n);
        for z in 0..n {
            for x in 0..n {
                data.height_data[z * n + x] = x as f32 * rise_per_cell;
            }
        }
        TerrainChunk::from_data(IVec2::ZERO, Vec3::ZERO, data)
    }

    fn base_config() -> WorldConfig {
        // No biomes: classification yields nothing and the spawner falls
        // back to its default decoration list.
        WorldConfig {
            chunk_size: 32.0,
            chunk_resolution: 17,
            biomes: crate::world::biome::BiomeMap::new(Vec::new(), None),
            ..WorldConfig::default()
        }
    }

    fn plain_decoration(density: f32) -> DecorationDefinition {
        DecorationDefinition::new("shrub", DecorationKind::Bush, density)
    }

    #[test]
    fn jittered_grid_fills_every_cell_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = jittered_grid(&mut rng, 32.0, 4.0);
        assert_eq!(points.len(), 64);
        assert!(points
            .iter()
            .all(|p| p.x >= 0.0 && p.x < 32.0 && p.y >= 0.0 && p.y < 32.0));
    }

    #[test]
    fn poisson_disk_respects_minimum_distance() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = poisson_disk(&mut rng, 32.0, 3.0, 3.0);
        assert!(!points.is_empty());
        assert!(points
            .iter()
            .all(|p| p.x >= 0.0 && p.x < 32.0 && p.y >= 0.0 && p.y < 32.0));
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= 3.0 - 1e-4);
            }
        }
    }

    #[test]
    fn placement_is_deterministic_per_seed_and_coord() {
        let config = base_config();
        let chunk = flat_chunk(&config);
        let mut spawner = VegetationSpawner::new(99, 100.0);
        spawner.default_decorations = vec![plain_decoration(0.05)];

        let a = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        let b = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert_eq!(a.instance_count(), b.instance_count());
        for (ba, bb) in a.batches.iter().zip(&b.batches) {
            assert_eq!(ba.variant, bb.variant);
            assert_eq!(ba.transforms, bb.transforms);
        }

        let mut other = VegetationSpawner::new(100, 100.0);
        other.default_decorations = vec![plain_decoration(0.05)];
        let c = other.spawn_chunk(&chunk, &config, Vec3::ZERO);
        let same = a.instance_count() == c.instance_count()
            && a.batches
                .iter()
                .zip(&c.batches)
                .all(|(x, y)| x.transforms == y.transforms);
        assert!(!same, "different seeds should move the vegetation");
    }

    #[test]
    fn steep_terrain_rejects_slope_limited_decorations() {
        let config = base_config();
        // 45 degrees: rise equals the cell size.
        let chunk = ramp_chunk(&config, config.cell_size());
        let mut spawner = VegetationSpawner::new(5, 100.0);
        let mut def = plain_decoration(0.1);
        def.max_slope = 5.0;
        spawner.default_decorations = vec![def];
        let placed = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert_eq!(placed.instance_count(), 0);

        let mut permissive = VegetationSpawner::new(5, 100.0);
        let mut def = plain_decoration(0.1);
        def.min_slope = 30.0;
        def.max_slope = 60.0;
        permissive.default_decorations = vec![def];
        let placed = permissive.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert!(placed.instance_count() > 0);
    }

    #[test]
    fn instance_cap_is_respected() {
        let config = base_config();
        let chunk = flat_chunk(&config);
        let mut spawner = VegetationSpawner::new(3, 100.0);
        let mut def = plain_decoration(4.0); // far more candidates than the cap
        def.max_instances = 10;
        spawner.default_decorations = vec![def];
        let placed = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert!(placed.instance_count() <= 10);
    }

    #[test]
    fn colliders_only_spawn_near_the_observer() {
        let config = base_config();
        let chunk = flat_chunk(&config);
        let mut spawner = VegetationSpawner::new(11, 20.0);
        let mut def = plain_decoration(0.05);
        def.with_collision = true;
        spawner.default_decorations = vec![def];

        let near = spawner.spawn_chunk(&chunk, &config, Vec3::new(16.0, 0.0, 16.0));
        assert!(!near.colliders.is_empty());
        let far = spawner.spawn_chunk(&chunk, &config, Vec3::new(5000.0, 0.0, 0.0));
        assert!(far.colliders.is_empty());
        assert_eq!(near.instance_count(), far.instance_count());
    }

    #[test]
    fn clustering_thins_the_field() {
        let config = base_config();
        let chunk = flat_chunk(&config);

        let mut dense = VegetationSpawner::new(21, 100.0);
        dense.default_decorations = vec![plain_decoration(0.2)];
        let unclustered = dense.spawn_chunk(&chunk, &config, Vec3::ZERO);

        let mut sparse = VegetationSpawner::new(21, 100.0);
        sparse.default_decorations = vec![plain_decoration(0.2).with_clustering(ClusterParams {
            noise: NoiseParams::simplex(77, 0.05),
            threshold: 0.6,
            edge_falloff: 0.5,
        })];
        let clustered = sparse.spawn_chunk(&chunk, &config, Vec3::ZERO);

        assert!(clustered.instance_count() < unclustered.instance_count());
    }

    #[test]
    fn batches_group_by_variant() {
        let config = base_config();
        let chunk = flat_chunk(&config);
        let mut spawner = VegetationSpawner::new(42, 100.0);
        spawner.default_decorations = vec![plain_decoration(0.2)];
        let placed = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert!(placed.instance_count() > 0);
        for batch in &placed.batches {
            assert!(batch.variant < PLACEHOLDER_VARIANTS);
            assert!(!batch.transforms.is_empty());
        }
        // variants are unique per decoration
        let mut seen = std::collections::HashSet::new();
        for batch in &placed.batches {
            assert!(seen.insert((batch.decoration.clone(), batch.variant)));
        }
    }

    #[test]
    fn dominant_biome_decorations_win_over_defaults() {
        let mut config = base_config();
        let meadow = crate::world::biome::BiomeData::new("meadow", 0, 0, (0.0, 1.0), (0.0, 1.0))
            .with_decorations(vec![plain_decoration(0.1)]);
        config.biomes = crate::world::biome::BiomeMap::new(vec![meadow], None);

        let chunk = flat_chunk(&config);
        let spawner = VegetationSpawner::new(8, 100.0);
        let placed = spawner.spawn_chunk(&chunk, &config, Vec3::ZERO);
        assert!(placed.instance_count() > 0);
        assert!(placed.batches.iter().all(|b| b.decoration == "shrub"));
    }

    #[test]
    fn variant_meshes_resolve_to_placeholders_and_cache() {
        let mut spawner = VegetationSpawner::new(1, 10.0);
        let def = DecorationDefinition::tree();
        assert_eq!(def.variant_count(), PLACEHOLDER_VARIANTS);
        let first = spawner.variant_mesh(&def, 0).unwrap().positions.len();
        let again = spawner.variant_mesh(&def, 0).unwrap().positions.len();
        assert_eq!(first, again);
        assert!(spawner.variant_mesh(&def, PLACEHOLDER_VARIANTS).is_none());
    }

    #[test]
    fn slope_range_is_normalized_at_construction() {
        let def = plain_decoration(0.1).with_slope_range(40.0, 10.0);
        assert!(def.max_slope >= def.min_slope);
    }
}

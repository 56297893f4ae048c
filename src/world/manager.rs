//! Chunk streaming, pooling and collision-radius management.
//!
//! The manager is the single writer of the active-chunk map: the worker
//! thread only ever produces `ChunkData`, and everything entity-shaped
//! happens here on the caller's thread, once per `update`.

use std::sync::Arc;

use glam::{IVec2, Vec2, Vec3, Vec3Swizzles};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::constants::MAX_SYNC_CHUNKS_PER_FRAME;
use crate::core::chunk_data::{ChunkData, ChunkState};
use crate::core::config::WorldConfig;
use crate::world::generator;
use crate::world::loader::AsyncGenerationHandler;

/// Notifications for external collaborators (vegetation, HUDs, physics),
/// drained once per frame via `drain_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEvent {
    ChunkReady(IVec2),
    ChunkUnloaded(IVec2),
    GenerationProgress { completed: usize, total: usize },
}

/// Heightfield snapshot consumed by a physics layer while the chunk is
/// within the collision radius.
#[derive(Debug, Clone)]
pub struct ChunkCollider {
    pub origin: Vec3,
    pub heights: Vec<f32>,
    pub width: usize,
    pub depth: usize,
    pub cell_size: f32,
}

/// The in-world chunk entity: generated payload plus render/physics
/// bookkeeping. Entities are pooled, never destroyed, to amortize
/// allocation cost.
#[derive(Debug, Default)]
pub struct TerrainChunk {
    pub coord: IVec2,
    pub origin: Vec3,
    pub data: ChunkData,
    /// Index into `data.mesh_lods` chosen by observer distance.
    pub current_lod: usize,
    collider: Option<ChunkCollider>,
}

impl TerrainChunk {
    /// Build a standalone entity around generated data, outside the pool.
    pub fn from_data(coord: IVec2, origin: Vec3, data: ChunkData) -> Self {
        let mut chunk = TerrainChunk::default();
        chunk.bind(coord, origin, data);
        chunk
    }

    fn bind(&mut self, coord: IVec2, origin: Vec3, data: ChunkData) {
        self.coord = coord;
        self.origin = origin;
        self.data = data;
        self.current_lod = 0;
        self.collider = None;
    }

    /// Return to the idle pool: drop payload and collider, keep buffers.
    fn reset(&mut self) {
        self.data.clear(IVec2::ZERO, self.data.width.max(1));
        self.collider = None;
        self.current_lod = 0;
    }

    fn set_collision(&mut self, enabled: bool, cell_size: f32) {
        match (enabled, self.collider.is_some()) {
            (true, false) => {
                self.collider = Some(ChunkCollider {
                    origin: self.origin,
                    heights: self.data.height_data.clone(),
                    width: self.data.width,
                    depth: self.data.depth,
                    cell_size,
                });
            }
            (false, true) => self.collider = None,
            _ => {}
        }
    }

    pub fn has_collision(&self) -> bool {
        self.collider.is_some()
    }

    pub fn collider(&self) -> Option<&ChunkCollider> {
        self.collider.as_ref()
    }
}

/// Owns the active-chunk map, the idle entity pool and (optionally) the
/// background generation pipeline. Drive it with `update(observer_pos)`
/// once per frame or once per observer-chunk-change.
pub struct ChunkManager {
    config: Arc<WorldConfig>,
    config_errors: Vec<String>,
    async_enabled: bool,
    loader: Option<AsyncGenerationHandler>,
    active: FxHashMap<IVec2, TerrainChunk>,
    pool: Vec<TerrainChunk>,
    events: Vec<ChunkEvent>,
    last_progress: Option<(usize, usize)>,
    refused_logged: bool,
}

impl ChunkManager {
    pub fn new(config: WorldConfig, async_enabled: bool) -> Self {
        let config_errors = config.validate();
        for error in &config_errors {
            warn!(%error, "world config invalid, streaming disabled until fixed");
        }
        let config = Arc::new(config);
        let loader = (async_enabled && config_errors.is_empty())
            .then(|| AsyncGenerationHandler::new(Arc::clone(&config)));

        Self {
            config,
            config_errors,
            async_enabled,
            loader,
            active: FxHashMap::default(),
            pool: Vec::new(),
            events: Vec::new(),
            last_progress: None,
            refused_logged: false,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.config_errors
    }

    /// Chunk coordinate containing a world position.
    pub fn world_to_coord(&self, pos: Vec3) -> IVec2 {
        (pos.xz() / self.config.chunk_size).floor().as_ivec2()
    }

    /// World position of a chunk's corner; exact lattice inverse of
    /// `world_to_coord` at the corner point.
    pub fn coord_to_world(&self, coord: IVec2) -> Vec3 {
        Vec3::new(
            coord.x as f32 * self.config.chunk_size,
            0.0,
            coord.y as f32 * self.config.chunk_size,
        )
    }

    /// Bounds check against `world_size`; valid coordinates are
    /// `0..world_size` per axis.
    pub fn is_coord_valid(&self, coord: IVec2) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.config.world_size.x
            && coord.y < self.config.world_size.y
    }

    pub fn get_chunk_at(&self, world_pos: Vec3) -> Option<&TerrainChunk> {
        self.active.get(&self.world_to_coord(world_pos))
    }

    pub fn get_chunk(&self, coord: IVec2) -> Option<&TerrainChunk> {
        self.active.get(&coord)
    }

    pub fn active_chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.active.values()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn collision_enabled_count(&self) -> usize {
        self.active.values().filter(|c| c.has_collision()).count()
    }

    /// Take all notifications emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ChunkEvent> {
        std::mem::take(&mut self.events)
    }

    /// One streaming step: reconcile the active set with the desired set
    /// around the observer, then refresh collision and LOD selection.
    pub fn update(&mut self, observer_pos: Vec3) {
        if !self.config_errors.is_empty() {
            if !self.refused_logged {
                warn!("update refused: config has validation errors");
                self.refused_logged = true;
            }
            return;
        }

        let observer_coord = self.world_to_coord(observer_pos);
        let view = self.config.view_distance;

        let mut desired = Vec::new();
        for dz in -view..=view {
            for dx in -view..=view {
                let coord = observer_coord + IVec2::new(dx, dz);
                if self.is_coord_valid(coord) {
                    desired.push(coord);
                }
            }
        }
        let desired_set: FxHashSet<IVec2> = desired.iter().copied().collect();

        // Unload everything that left the desired set.
        let to_unload: Vec<IVec2> = self
            .active
            .keys()
            .filter(|coord| !desired_set.contains(coord))
            .copied()
            .collect();
        for coord in to_unload {
            if let Some(mut chunk) = self.active.remove(&coord) {
                chunk.reset();
                self.pool.push(chunk);
                self.events.push(ChunkEvent::ChunkUnloaded(coord));
            }
        }

        // Stop generating chunks the observer walked away from.
        if let Some(loader) = &mut self.loader {
            for coord in loader.pending_coords() {
                if !desired_set.contains(&coord) {
                    loader.cancel_request(coord);
                }
            }
        }

        // Load what is missing, nearest chunks first.
        let mut missing: Vec<IVec2> = desired
            .iter()
            .filter(|coord| !self.active.contains_key(coord))
            .copied()
            .collect();
        missing.sort_by_key(|coord| {
            let d = *coord - observer_coord;
            d.x * d.x + d.y * d.y
        });

        if let Some(loader) = &mut self.loader {
            for coord in &missing {
                loader.request_chunk(*coord);
            }
            let results = loader.drain_results();
            for result in results {
                if desired_set.contains(&result.coord) && !self.active.contains_key(&result.coord)
                {
                    self.attach(result.coord, result.data);
                } else {
                    debug!(coord = ?result.coord, "dropping chunk that left the view radius");
                }
            }
        } else {
            // Synchronous fallback, bounded per frame so a big desired set
            // cannot stall the caller.
            for coord in missing.into_iter().take(MAX_SYNC_CHUNKS_PER_FRAME) {
                let data = generator::generate_chunk_data(coord, &self.config);
                self.attach(coord, data);
            }
        }

        // Collision is a view-independent radius around the observer.
        let cell = self.config.cell_size();
        let collision_radius = self.config.collision_radius;
        for (coord, chunk) in &mut self.active {
            let delta = (*coord - observer_coord).abs();
            let chebyshev = delta.x.max(delta.y);
            chunk.set_collision(chebyshev <= collision_radius, cell);
        }

        // Pick the mesh LOD for the current observer distance.
        let half = self.config.chunk_size * 0.5;
        for chunk in self.active.values_mut() {
            if chunk.data.mesh_lods.is_empty() {
                continue;
            }
            let center = chunk.origin.xz() + Vec2::splat(half);
            let distance = center.distance(observer_pos.xz());
            let level = self
                .config
                .lod_distances
                .iter()
                .filter(|&&threshold| distance > threshold)
                .count();
            chunk.current_lod = level.min(chunk.data.mesh_lods.len() - 1);
        }

        // Progress notification while a load wave is outstanding.
        let completed = desired
            .iter()
            .filter(|coord| {
                self.active
                    .get(coord)
                    .is_some_and(|c| c.data.state == ChunkState::Ready)
            })
            .count();
        let progress = (completed, desired.len());
        if self.last_progress != Some(progress) {
            self.events.push(ChunkEvent::GenerationProgress {
                completed: progress.0,
                total: progress.1,
            });
            self.last_progress = Some(progress);
        }
    }

    fn attach(&mut self, coord: IVec2, data: ChunkData) {
        let mut chunk = self.pool.pop().unwrap_or_default();
        chunk.bind(coord, self.coord_to_world(coord), data);
        self.active.insert(coord, chunk);
        self.events.push(ChunkEvent::ChunkReady(coord));
    }

    /// Throw away every active chunk and all in-flight work; the next
    /// `update` reloads the world from scratch.
    pub fn regenerate(&mut self) {
        info!("regenerating world");
        let coords: Vec<IVec2> = self.active.keys().copied().collect();
        for coord in coords {
            if let Some(mut chunk) = self.active.remove(&coord) {
                chunk.reset();
                self.pool.push(chunk);
                self.events.push(ChunkEvent::ChunkUnloaded(coord));
            }
        }
        if let Some(loader) = &mut self.loader {
            loader.cancel_all();
        }
        self.last_progress = None;
    }

    /// Swap in a new configuration. Triggers a full regeneration and a
    /// fresh worker snapshot; never mutates config under running work.
    pub fn set_config(&mut self, config: WorldConfig) {
        self.regenerate();
        self.config_errors = config.validate();
        for error in &self.config_errors {
            warn!(%error, "world config invalid, streaming disabled until fixed");
        }
        self.config = Arc::new(config);
        self.refused_logged = false;
        self.loader = (self.async_enabled && self.config_errors.is_empty())
            .then(|| AsyncGenerationHandler::new(Arc::clone(&self.config)));
    }

    /// Editor preview: synchronously rebuild the square block of chunks
    /// `[0, extent)` per axis anchored at the origin, independent of any
    /// observer.
    pub fn regenerate_preview(&mut self, extent: i32) {
        if !self.config_errors.is_empty() {
            warn!("preview refused: config has validation errors");
            return;
        }
        self.regenerate();
        for z in 0..extent {
            for x in 0..extent {
                let coord = IVec2::new(x, z);
                if !self.is_coord_valid(coord) {
                    continue;
                }
                let data = generator::generate_chunk_data(coord, &self.config);
                self.attach(coord, data);
            }
        }
    }
}

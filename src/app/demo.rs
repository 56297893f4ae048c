//! Headless streaming walkthrough.
//!
//! Moves an observer diagonally across the world, driving the chunk
//! manager every step and reporting ready/unloaded chunks, generation
//! progress and vegetation counts on the log. Useful for profiling the
//! generation pipeline without a render layer.

use clap::Parser;
use glam::Vec3;
use tracing::{debug, info};

use terrastream::constants::DEFAULT_COLLIDER_DISTANCE;
use terrastream::core::config::{NoiseParams, WorldConfig};
use terrastream::world::biome::BiomeMap;
use terrastream::world::manager::{ChunkEvent, ChunkManager};
use terrastream::world::vegetation::VegetationSpawner;
use terrastream::{
    DEFAULT_MOISTURE_FREQUENCY, DEFAULT_TERRAIN_FREQUENCY, DEFAULT_VIEW_DISTANCE,
};

/// Terrain streaming demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed driving terrain, moisture and vegetation
    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Streaming radius around the observer, in chunks
    #[arg(long, default_value_t = DEFAULT_VIEW_DISTANCE)]
    view_distance: i32,

    /// Number of observer steps across the world
    #[arg(long, default_value_t = 200)]
    steps: u32,

    /// Generate chunks on the calling thread instead of the worker
    #[arg(long, default_value_t = false)]
    sync: bool,
}

pub fn run_demo() {
    let args = Args::parse();

    let config = WorldConfig {
        view_distance: args.view_distance,
        noise: Some(NoiseParams::fbm(args.seed, DEFAULT_TERRAIN_FREQUENCY)),
        moisture_noise: Some(NoiseParams::simplex(
            args.seed.wrapping_add(1),
            DEFAULT_MOISTURE_FREQUENCY,
        )),
        biomes: BiomeMap::standard(args.seed),
        ..WorldConfig::default()
    };
    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            tracing::error!(%error, "invalid world config");
        }
        return;
    }

    let world_extent = config.world_size.as_vec2() * config.chunk_size;
    let mut manager = ChunkManager::new(config, !args.sync);
    let spawner = VegetationSpawner::new(args.seed as u32, DEFAULT_COLLIDER_DISTANCE);

    info!(
        seed = args.seed,
        view_distance = args.view_distance,
        background = !args.sync,
        "walking the observer across a {}x{} unit world",
        world_extent.x,
        world_extent.y
    );

    let mut total_vegetation = 0usize;
    for step in 0..args.steps {
        let t = step as f32 / args.steps.max(1) as f32;
        let observer = Vec3::new(world_extent.x * t, 0.0, world_extent.y * t);
        manager.update(observer);

        for event in manager.drain_events() {
            match event {
                ChunkEvent::ChunkReady(coord) => {
                    let chunk = manager
                        .get_chunk(coord)
                        .expect("ready chunk must be active");
                    let vegetation = spawner.spawn_chunk(chunk, manager.config(), observer);
                    total_vegetation += vegetation.instance_count();
                    debug!(
                        ?coord,
                        lod = chunk.current_lod,
                        instances = vegetation.instance_count(),
                        "chunk ready"
                    );
                }
                ChunkEvent::ChunkUnloaded(coord) => {
                    debug!(?coord, "chunk unloaded");
                }
                ChunkEvent::GenerationProgress { completed, total } => {
                    debug!(completed, total, "generation progress");
                }
            }
        }

        if step % 20 == 0 {
            info!(
                step,
                active = manager.active_count(),
                pooled = manager.pool_size(),
                colliders = manager.collision_enabled_count(),
                "streaming state"
            );
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    info!(
        active = manager.active_count(),
        pooled = manager.pool_size(),
        total_vegetation,
        "walkthrough finished"
    );
}

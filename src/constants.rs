// World defaults
pub const DEFAULT_WORLD_SIZE: i32 = 16;
pub const DEFAULT_CHUNK_SIZE: f32 = 64.0;
pub const DEFAULT_CHUNK_RESOLUTION: usize = 33;
pub const DEFAULT_HEIGHT_SCALE: f32 = 40.0;
pub const DEFAULT_VIEW_DISTANCE: i32 = 4;
pub const DEFAULT_COLLISION_RADIUS: i32 = 2;
pub const DEFAULT_LOD_DISTANCES: [f32; 3] = [96.0, 192.0, 384.0];
pub const MIN_CHUNK_RESOLUTION: usize = 3;

// Noise defaults
pub const DEFAULT_TERRAIN_FREQUENCY: f32 = 0.004;
pub const DEFAULT_MOISTURE_FREQUENCY: f32 = 0.0015;

// Optimization constants
pub const MAX_SYNC_CHUNKS_PER_FRAME: usize = 4;
pub const RESULT_DRAIN_BATCH: usize = 64;

// Vegetation constants
pub const MAX_INSTANCES_PER_CHUNK: usize = 512;
pub const DEFAULT_COLLIDER_DISTANCE: f32 = 48.0;
pub const POISSON_ATTEMPTS: usize = 30;
pub const PLACEHOLDER_VARIANTS: usize = 3;

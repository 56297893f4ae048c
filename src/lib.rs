// Core module with fundamental types
pub mod core;

// World module with generation, streaming and vegetation
pub mod world;

// Other modules
pub mod constants;

// Re-exports
pub use constants::*;
pub use crate::core::{ChunkData, ChunkState, FractalParams, NoiseParams, WorldConfig};
pub use world::{
    AsyncGenerationHandler, BiomeData, BiomeMap, ChunkEvent, ChunkManager, ChunkVegetation,
    DecorationDefinition, DecorationKind, GenerationResult, MeshData, TerrainChunk,
    TerrainShaping, VegetationSpawner, generate_chunk_data,
};

//! World generation and streaming modules.
//! Contains height sampling, mesh building, biomes, the background
//! generation pipeline, chunk streaming and vegetation placement.

pub mod biome;
pub mod decoration_mesh;
pub mod generator;
pub mod height;
pub mod loader;
pub mod manager;
pub mod mesh;
pub mod vegetation;

// Re-export commonly used types
pub use biome::{BiomeData, BiomeMap, TerrainShaping};
pub use generator::generate_chunk_data;
pub use loader::{AsyncGenerationHandler, GenerationResult};
pub use manager::{ChunkEvent, ChunkManager, TerrainChunk};
pub use mesh::MeshData;
pub use vegetation::{ChunkVegetation, DecorationDefinition, DecorationKind, VegetationSpawner};

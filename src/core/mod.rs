//! Fundamental data types shared by the generation and streaming layers.

pub mod chunk_data;
pub mod config;

pub use chunk_data::{ChunkData, ChunkState};
pub use config::{FractalParams, NoiseParams, WorldConfig};

//! Core types for the chunking engine.

mod chunk;
mod config;
mod page;

pub use chunk::Chunk;
pub use config::{
    ChunkingConfig, ChunkingToggle, FlushConfig, HeuristicConfig, MergeConfig,
    OverlapConfig, OversizedConfig, TargetConfig,
};
pub use page::PageMap;

//! Chunking pipeline stages and the chunkers built from them.

mod base;
mod adaptive;
mod fallback;

pub mod assembler;
pub mod paragraph;
pub mod section;
pub mod splitter;
pub mod target;

pub use base::{
    char_len, has_heading_marker, is_heading_line, is_list_line, normalize_newlines,
    with_heading_marker, Chunker, HEADING_PREFIX,
};
pub use adaptive::{AdaptiveChunker, ChunkingReport};
pub use fallback::{FallbackChunker, PAGE_SEPARATOR};

pub use assembler::{AssemblerState, ChunkAssembler, PARAGRAPH_SEPARATOR};
pub use paragraph::{segment_pages, PageStats, Paragraph, Segmentation};
pub use section::{build_sections, merge_small_sections, Section};
pub use splitter::split_oversized;
pub use target::{compute_target, AdaptiveTarget, GroupDensity, TargetProfile};

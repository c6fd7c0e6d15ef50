//! Page Chunker Library
//!
//! Adaptive, structure-aware chunking of paged document text for RAG pipelines.
//! Page text is segmented into paragraphs, grouped into heading/page-bounded
//! sections and greedily packed into chunks whose target size follows the
//! local density of headings, paragraphs and lists.

pub mod batch;
pub mod chunkers;
pub mod error;
pub mod input;
pub mod output;
pub mod router;
pub mod types;

pub use types::{Chunk, ChunkingConfig, PageMap};
pub use chunkers::{AdaptiveChunker, Chunker, ChunkingReport, FallbackChunker};
pub use error::ConfigError;
pub use router::ChunkingRouter;
pub use batch::{BatchProcessor, BatchConfig, BatchResult};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::types::*;
    pub use crate::chunkers::{AdaptiveChunker, Chunker, FallbackChunker};
    pub use crate::router::ChunkingRouter;
    pub use crate::input::{PageTextProvider, FallbackProvider};
    pub use crate::output::{DocumentSink, DocumentMetadata};
    pub use crate::batch::*;
}

/// Chunk one document with the given configuration.
///
/// Never fails: blank input yields a single empty chunk.
pub fn chunk_pages(pages: &PageMap, config: &ChunkingConfig) -> Vec<Chunk> {
    router::select_chunker(config).chunk(pages, config)
}

/// Default target size in characters when no density signal applies
pub const DEFAULT_BASELINE_TARGET: usize = 2400;

/// Default lower bound of the dense-content target range
pub const DEFAULT_DENSE_MIN: usize = 1400;

/// Default upper bound of the dense-content target range
pub const DEFAULT_DENSE_MAX: usize = 1700;

/// Default lower bound of the narrative-content target range
pub const DEFAULT_NARRATIVE_MIN: usize = 3200;

/// Default upper bound of the narrative-content target range
pub const DEFAULT_NARRATIVE_MAX: usize = 3600;

/// Default hard floor for any computed target
pub const DEFAULT_ABSOLUTE_MIN: usize = 900;

/// Default hard ceiling for any computed target
pub const DEFAULT_ABSOLUTE_MAX: usize = 3800;

/// Sections below this many characters are merged into their successor
pub const DEFAULT_SMALL_SECTION_THRESHOLD: usize = 200;

/// Minimum fraction of the target a pending group must hold before an early flush
pub const DEFAULT_MIN_FILL_FACTOR: f64 = 0.3;

/// Sections above this many characters are split on paragraph boundaries
pub const DEFAULT_SOFT_SPLIT_CAP: usize = DEFAULT_ABSOLUTE_MAX;

/// Headings per 1000 characters above which content counts as dense
pub const DEFAULT_HEADING_DENSITY_HIGH: f64 = 1.2;

/// Paragraphs per 1000 characters above which content counts as dense
pub const DEFAULT_PARAGRAPH_DENSITY_HIGH: f64 = 2.0;

/// Share of list lines above which content counts as dense
pub const DEFAULT_LIST_DENSITY_HIGH: f64 = 0.35;

/// Average paragraph length above which content counts as narrative
pub const DEFAULT_LONG_PARAGRAPH_LEN: usize = 450;

/// Excess paragraph length at which the narrative boost saturates
pub const DEFAULT_LONG_PARAGRAPH_LEN_MAX_BOOST: usize = 400;

/// Overlap fraction for targets up to the dense maximum
pub const DEFAULT_OVERLAP_SMALL_TARGET_PERCENT: f64 = 0.08;

/// Overlap fraction for larger targets
pub const DEFAULT_OVERLAP_LARGE_TARGET_PERCENT: f64 = 0.12;

/// Minimum overlap in characters
pub const DEFAULT_OVERLAP_MIN_CHARS: usize = 300;

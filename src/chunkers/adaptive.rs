//! Adaptive chunker: paragraphs, sections, density-driven packing.

use serde::Serialize;
use tracing::debug;

use super::assembler::ChunkAssembler;
use super::base::Chunker;
use super::paragraph::{segment_pages, PageStats};
use super::section::{build_sections, merge_small_sections};
use super::splitter::split_oversized;
use crate::types::{Chunk, ChunkingConfig, PageMap};

/// Chunks of one document together with segmentation diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkingReport {
    pub chunks: Vec<Chunk>,
    /// Structural statistics per input page
    pub page_stats: Vec<PageStats>,
    /// Sections fed to the assembler after merging and splitting
    pub sections_packed: usize,
}

/// Structure-aware chunker whose chunk size follows content density.
///
/// Pages are split into paragraphs, grouped into sections at page and
/// heading boundaries, small sections are merged forward and oversized ones
/// split, then sections are greedily packed against an adaptive target.
pub struct AdaptiveChunker;

impl AdaptiveChunker {
    /// Create a new adaptive chunker.
    pub fn new() -> Self {
        Self
    }

    /// Chunk a document and keep the segmentation diagnostics.
    pub fn chunk_with_report(&self, pages: &PageMap, config: &ChunkingConfig) -> ChunkingReport {
        let segmentation = segment_pages(pages);
        for stats in &segmentation.page_stats {
            debug!(
                page = stats.page_number,
                paragraphs = stats.paragraph_count,
                headings = stats.heading_count,
                avg_paragraph_len = stats.avg_paragraph_len,
                list_lines = stats.list_line_count,
                lines = stats.total_line_count,
                "Page structure"
            );
        }

        let paragraphs = segmentation.paragraphs;
        if paragraphs.is_empty() {
            debug!(pages = pages.len(), "No text found, emitting empty chunk");
            return ChunkingReport {
                chunks: vec![Chunk::empty()],
                page_stats: segmentation.page_stats,
                sections_packed: 0,
            };
        }

        let sections = build_sections(&paragraphs);
        let built = sections.len();
        let sections = merge_small_sections(sections, config.merge.small_section_threshold);
        let sections = split_oversized(sections, &paragraphs, config.oversized.soft_split_cap);
        let sections_packed = sections.len();

        let mut assembler = ChunkAssembler::new(&paragraphs, config);
        for section in sections {
            assembler.push(section);
        }
        let chunks = assembler.finish();

        debug!(
            paragraphs = paragraphs.len(),
            sections_built = built,
            sections_packed,
            chunks = chunks.len(),
            "Chunked document"
        );

        ChunkingReport {
            chunks,
            page_stats: segmentation.page_stats,
            sections_packed,
        }
    }
}

impl Default for AdaptiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for AdaptiveChunker {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn description(&self) -> &'static str {
        "Density-adaptive chunker respecting page, heading and paragraph boundaries"
    }

    fn chunk(&self, pages: &PageMap, config: &ChunkingConfig) -> Vec<Chunk> {
        self.chunk_with_report(pages, config).chunks
    }
}

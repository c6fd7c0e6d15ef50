//! Single-chunk formatter used when adaptive chunking is disabled.

use tracing::debug;

use super::base::{char_len, has_heading_marker, is_heading_line, normalize_newlines, Chunker, HEADING_PREFIX};
use crate::types::{Chunk, ChunkingConfig, PageMap};

/// Marker placed between pages in the fallback output.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Emits the whole document as one chunk, marking heading lines.
///
/// Works line by line and ignores paragraph and section structure.
pub struct FallbackChunker;

impl FallbackChunker {
    /// Create a new fallback chunker.
    pub fn new() -> Self {
        Self
    }

    /// Mark standalone heading lines of one page.
    fn format_page(text: &str) -> String {
        normalize_newlines(text)
            .split('\n')
            .map(|line| {
                let trimmed = line.trim();
                if !trimmed.is_empty() && is_heading_line(trimmed) && !has_heading_marker(trimmed) {
                    format!("{}{}", HEADING_PREFIX, trimmed)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format every page and join them with [`PAGE_SEPARATOR`].
    pub fn format_pages(pages: &PageMap) -> String {
        pages
            .iter()
            .map(|(_, text)| Self::format_page(text))
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR)
    }
}

impl Default for FallbackChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for FallbackChunker {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn description(&self) -> &'static str {
        "Whole document as a single chunk with marked headings"
    }

    fn chunk(&self, pages: &PageMap, _config: &ChunkingConfig) -> Vec<Chunk> {
        let text = Self::format_pages(pages);
        let mut page_numbers = pages.page_numbers();
        if page_numbers.is_empty() {
            page_numbers.push(1);
        }

        debug!(pages = pages.len(), chars = char_len(&text), "Formatted document as single chunk");

        vec![Chunk {
            adaptive_target: char_len(&text),
            text,
            page_start: 1,
            page_end: pages.len().max(1) as u32,
            pages: page_numbers,
            chunk_number: 0,
            section_count: 0,
        }]
    }
}

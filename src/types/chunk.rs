//! Chunk type definitions.

use serde::{Deserialize, Serialize};

/// A chunk of document text produced by a chunker.
///
/// Chunks are emitted in order and numbered `0..N-1`; downstream consumers
/// derive stable identifiers from `chunk_number`, so the sequence must be
/// reproducible for identical input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, paragraphs joined by blank lines
    pub text: String,

    /// Lowest page number contributing to this chunk
    pub page_start: u32,

    /// Highest page number contributing to this chunk
    pub page_end: u32,

    /// Sorted, unique page numbers contributing to this chunk
    pub pages: Vec<u32>,

    /// Position of this chunk within its document (0-indexed)
    pub chunk_number: usize,

    /// Number of sections packed into this chunk
    pub section_count: usize,

    /// Character count accumulated when the chunk was flushed.
    ///
    /// Despite the name this is the achieved size of the chunk, not the
    /// target that drove the flush decision.
    pub adaptive_target: usize,
}

impl Chunk {
    /// The placeholder chunk returned for input without any text.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            page_start: 1,
            page_end: 1,
            pages: vec![1],
            chunk_number: 0,
            section_count: 0,
            adaptive_target: 0,
        }
    }

    /// Get the length of the chunk text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chunk_shape() {
        let chunk = Chunk::empty();
        assert!(chunk.is_empty());
        assert_eq!(chunk.pages, vec![1]);
        assert_eq!(chunk.page_start, chunk.page_end);
        assert_eq!(chunk.adaptive_target, 0);
    }

    #[test]
    fn test_char_len_counts_scalars() {
        let chunk = Chunk {
            text: "Überblick".to_string(),
            ..Chunk::empty()
        };
        assert_eq!(chunk.char_len(), 9);
        assert_eq!(chunk.text.len(), 10);
    }
}

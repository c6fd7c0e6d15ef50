//! Base trait for all chunkers and shared text heuristics.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{Chunk, ChunkingConfig, PageMap};

/// The core trait that all chunkers must implement.
///
/// A chunker takes the extracted text of one document and splits it into
/// chunks suitable for embedding and retrieval. Chunking is total: every
/// input, including an empty page map, yields at least one chunk.
pub trait Chunker: Send + Sync {
    /// Get the name of this chunker.
    fn name(&self) -> &'static str;

    /// Chunk the given pages with the provided configuration.
    ///
    /// # Arguments
    /// * `pages` - Extracted page text of a single document
    /// * `config` - Configuration for chunking
    ///
    /// # Returns
    /// Chunks in ascending `chunk_number` order, never empty.
    fn chunk(&self, pages: &PageMap, config: &ChunkingConfig) -> Vec<Chunk>;

    /// Get the description of this chunker.
    fn description(&self) -> &'static str {
        "A page text chunker"
    }
}

lazy_static! {
    /// Runs of two or more newlines separate paragraphs.
    pub(crate) static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n{2,}").unwrap();

    /// A standalone heading line: a numbered marker such as `3.` followed by
    /// whitespace or the end of the line, or a short capitalised line made of
    /// letters, digits, spaces and `,;:/()-`.
    static ref HEADING_LINE: Regex =
        Regex::new(r"^(?:\d+\.(?:\s.*)?|\p{Lu}[\p{L}\p{N} ,;:/()\-]{3,59})$").unwrap();

    /// A bullet or numbered list item.
    static ref LIST_LINE: Regex = Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").unwrap();

    /// A markdown ATX heading marker.
    static ref HEADING_MARKER: Regex = Regex::new(r"^#{1,6}\s").unwrap();
}

/// Markdown prefix added to detected headings.
pub const HEADING_PREFIX: &str = "## ";

/// Count Unicode scalar values.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Check whether a single trimmed line looks like a heading.
pub fn is_heading_line(line: &str) -> bool {
    HEADING_LINE.is_match(line)
}

/// Check whether a line starts a list item.
pub fn is_list_line(line: &str) -> bool {
    LIST_LINE.is_match(line)
}

/// Check whether text already starts with a markdown heading marker.
pub fn has_heading_marker(text: &str) -> bool {
    HEADING_MARKER.is_match(text)
}

/// Prefix heading text with `## ` unless it is already marked.
pub fn with_heading_marker(text: &str) -> Cow<'_, str> {
    if has_heading_marker(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{}{}", HEADING_PREFIX, text))
    }
}

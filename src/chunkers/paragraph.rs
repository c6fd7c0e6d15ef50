//! Paragraph segmentation of page text.

use serde::Serialize;

use super::base::{char_len, is_heading_line, is_list_line, normalize_newlines, PARAGRAPH_BREAK};
use crate::types::PageMap;

/// A trimmed, non-empty run of text between blank lines on a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub text: String,
    /// Length in Unicode scalar values
    pub char_count: usize,
    pub page_number: u32,
    /// Single line matching the heading pattern
    pub is_heading: bool,
    /// At least one line is a list item
    pub is_list: bool,
    pub line_count: usize,
    pub list_line_count: usize,
    /// Char offset of the paragraph within the whole document
    pub start_offset: usize,
}

impl Paragraph {
    /// Classify a trimmed paragraph.
    pub fn new(text: impl Into<String>, page_number: u32, start_offset: usize) -> Self {
        let text = text.into();
        let line_count = text.split('\n').count();
        let list_line_count = text.split('\n').filter(|line| is_list_line(line)).count();

        Self {
            char_count: char_len(&text),
            is_heading: line_count == 1 && is_heading_line(&text),
            is_list: list_line_count > 0,
            line_count,
            list_line_count,
            page_number,
            start_offset,
            text,
        }
    }
}

/// Structural statistics of one page.
///
/// Reported for diagnostics; target sizing works on section groups instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    pub page_number: u32,
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub avg_paragraph_len: f64,
    pub list_line_count: usize,
    pub total_line_count: usize,
}

impl PageStats {
    fn from_paragraphs(page_number: u32, paragraphs: &[Paragraph]) -> Self {
        let total_chars: usize = paragraphs.iter().map(|p| p.char_count).sum();
        let avg_paragraph_len = if paragraphs.is_empty() {
            0.0
        } else {
            total_chars as f64 / paragraphs.len() as f64
        };

        Self {
            page_number,
            heading_count: paragraphs.iter().filter(|p| p.is_heading).count(),
            paragraph_count: paragraphs.len(),
            avg_paragraph_len,
            list_line_count: paragraphs.iter().map(|p| p.list_line_count).sum(),
            total_line_count: paragraphs.iter().map(|p| p.line_count).sum(),
        }
    }
}

/// Paragraphs of a document in document order, with per-page statistics.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub paragraphs: Vec<Paragraph>,
    pub page_stats: Vec<PageStats>,
}

/// Split every page into classified paragraphs.
pub fn segment_pages(pages: &PageMap) -> Segmentation {
    let mut segmentation = Segmentation::default();
    let mut page_base = 0;

    for (page_number, raw) in pages.iter() {
        let text = normalize_newlines(raw);
        let first = segmentation.paragraphs.len();

        let mut byte_cursor = 0;
        let mut char_cursor = 0;
        let breaks = PARAGRAPH_BREAK
            .find_iter(&text)
            .map(|m| (m.start(), m.end()))
            .chain(std::iter::once((text.len(), text.len())));

        for (start, end) in breaks {
            let piece = &text[byte_cursor..start];
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                let leading = &piece[..piece.len() - piece.trim_start().len()];
                let offset = page_base + char_cursor + char_len(leading);
                segmentation
                    .paragraphs
                    .push(Paragraph::new(trimmed, page_number, offset));
            }
            char_cursor += char_len(&text[byte_cursor..end]);
            byte_cursor = end;
        }

        segmentation.page_stats.push(PageStats::from_paragraphs(
            page_number,
            &segmentation.paragraphs[first..],
        ));
        page_base += char_cursor;
    }

    segmentation
}

//! Greedy packing of sections into chunks.

use std::borrow::Cow;
use std::collections::BTreeSet;

use tracing::trace;

use super::base::with_heading_marker;
use super::paragraph::Paragraph;
use super::section::Section;
use super::target::compute_target;
use crate::types::{Chunk, ChunkingConfig};

/// Separator placed between paragraphs inside a chunk.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Whether sections are waiting to be flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Empty,
    Accumulating,
}

/// Packs sections into chunks using the adaptive target and a fill-factor
/// hysteresis rule.
///
/// Before each section the target is recomputed from the pending group. A
/// full enough group is flushed before a section that would overflow it; an
/// underfilled group takes the section and is flushed right after if it then
/// overflows and the section itself was substantial.
pub struct ChunkAssembler<'a> {
    paragraphs: &'a [Paragraph],
    config: &'a ChunkingConfig,
    pending: Vec<Section>,
    pending_chars: usize,
    next_chunk_number: usize,
    chunks: Vec<Chunk>,
    targets: Vec<usize>,
}

impl<'a> ChunkAssembler<'a> {
    /// Create an assembler over the document's paragraphs.
    pub fn new(paragraphs: &'a [Paragraph], config: &'a ChunkingConfig) -> Self {
        Self {
            paragraphs,
            config,
            pending: Vec::new(),
            pending_chars: 0,
            next_chunk_number: 0,
            chunks: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> AssemblerState {
        if self.pending.is_empty() {
            AssemblerState::Empty
        } else {
            AssemblerState::Accumulating
        }
    }

    /// Characters waiting in the pending group.
    pub fn pending_chars(&self) -> usize {
        self.pending_chars
    }

    /// Targets used for each packing decision so far, in order.
    pub fn targets_used(&self) -> &[usize] {
        &self.targets
    }

    /// Chunks flushed so far.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Feed the next section in document order.
    pub fn push(&mut self, section: Section) {
        let computed = compute_target(&self.pending, self.paragraphs, self.config);
        let bounds = &self.config.targets;
        let target = computed.target.max(bounds.absolute_min).min(bounds.absolute_max);
        self.targets.push(target);

        trace!(
            target,
            overlap = computed.overlap,
            profile = ?computed.profile,
            pending_chars = self.pending_chars,
            section_chars = section.total_chars,
            "Packing decision"
        );

        let section_chars = section.total_chars;
        let min_fill = target as f64 * self.config.flush.min_fill_factor;

        match self.state() {
            AssemblerState::Empty => self.append(section),
            AssemblerState::Accumulating => {
                if self.pending_chars + section_chars > target && self.pending_chars as f64 > min_fill {
                    self.flush();
                    self.append(section);
                } else {
                    self.append(section);
                    if self.pending_chars > target && section_chars as f64 > min_fill {
                        self.flush();
                    }
                }
            }
        }
    }

    /// Flush any pending sections and return all chunks.
    pub fn finish(mut self) -> Vec<Chunk> {
        if !self.pending.is_empty() {
            self.flush();
        }
        self.chunks
    }

    fn append(&mut self, section: Section) {
        self.pending_chars += section.total_chars;
        self.pending.push(section);
    }

    fn flush(&mut self) {
        let group = std::mem::take(&mut self.pending);
        let achieved = std::mem::take(&mut self.pending_chars);

        // Split sub-sections are rejoined in document order
        let mut indices: Vec<usize> = group
            .iter()
            .flat_map(|section| section.paragraph_indices.iter().copied())
            .collect();
        indices.sort_unstable();

        let text = indices
            .iter()
            .map(|&index| {
                let paragraph = &self.paragraphs[index];
                if paragraph.is_heading {
                    with_heading_marker(&paragraph.text)
                } else {
                    Cow::Borrowed(paragraph.text.as_str())
                }
            })
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR);

        let mut pages: Vec<u32> = group
            .iter()
            .flat_map(|section| section.pages.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if pages.is_empty() {
            pages.push(1);
        }

        let chunk = Chunk {
            text,
            page_start: pages[0],
            page_end: pages[pages.len() - 1],
            pages,
            chunk_number: self.next_chunk_number,
            section_count: group.len(),
            adaptive_target: achieved,
        };

        trace!(
            chunk_number = chunk.chunk_number,
            chars = achieved,
            sections = chunk.section_count,
            "Flushed chunk"
        );

        self.next_chunk_number += 1;
        self.chunks.push(chunk);
    }
}

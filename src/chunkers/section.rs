//! Grouping of paragraphs into sections.

use std::collections::BTreeSet;

use serde::Serialize;

use super::paragraph::Paragraph;

/// A run of paragraphs bounded by a page change or a heading.
///
/// Paragraphs are referenced by their index in the document's paragraph list;
/// indices are kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub paragraph_indices: Vec<usize>,
    pub total_chars: usize,
    /// Texts of the heading paragraphs in this section
    pub headings: BTreeSet<String>,
    /// Pages touched by this section
    pub pages: BTreeSet<u32>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a section from paragraph indices in ascending order.
    pub fn from_indices(indices: &[usize], paragraphs: &[Paragraph]) -> Self {
        let mut section = Self::new();
        for &index in indices {
            section.push(index, &paragraphs[index]);
        }
        section
    }

    /// Append a paragraph.
    pub fn push(&mut self, index: usize, paragraph: &Paragraph) {
        self.paragraph_indices.push(index);
        self.total_chars += paragraph.char_count;
        self.pages.insert(paragraph.page_number);
        if paragraph.is_heading {
            self.headings.insert(paragraph.text.clone());
        }
    }

    /// Absorb the section that immediately follows this one.
    pub fn absorb(&mut self, next: Section) {
        self.paragraph_indices.extend(next.paragraph_indices);
        self.total_chars += next.total_chars;
        self.headings.extend(next.headings);
        self.pages.extend(next.pages);
    }

    /// Check if the section holds no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraph_indices.is_empty()
    }

    /// Number of paragraphs in the section.
    pub fn len(&self) -> usize {
        self.paragraph_indices.len()
    }
}

/// Group paragraphs into sections, opening a new section on every page change
/// and on every heading.
pub fn build_sections(paragraphs: &[Paragraph]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::new();
    let mut previous_page = None;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let page_changed = previous_page.is_some_and(|page| page != paragraph.page_number);
        if !current.is_empty() && (page_changed || paragraph.is_heading) {
            sections.push(std::mem::take(&mut current));
        }

        current.push(index, paragraph);
        previous_page = Some(paragraph.page_number);
    }

    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

/// Merge each section smaller than `threshold` with its successor.
///
/// Single left-to-right pass: a merged pair is not reconsidered, so a chain
/// of tiny sections collapses pairwise only.
pub fn merge_small_sections(sections: Vec<Section>, threshold: usize) -> Vec<Section> {
    let mut merged = Vec::with_capacity(sections.len());
    let mut iter = sections.into_iter();

    while let Some(mut section) = iter.next() {
        if section.total_chars < threshold {
            if let Some(next) = iter.next() {
                section.absorb(next);
            }
        }
        merged.push(section);
    }

    merged
}

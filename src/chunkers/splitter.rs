//! Paragraph-aligned splitting of oversized sections.

use tracing::debug;

use super::paragraph::Paragraph;
use super::section::Section;

/// Replace every section above `cap` characters with paragraph-aligned
/// sub-sections, keeping document order.
pub fn split_oversized(sections: Vec<Section>, paragraphs: &[Paragraph], cap: usize) -> Vec<Section> {
    let mut result = Vec::with_capacity(sections.len());

    for section in sections {
        if section.total_chars > cap {
            let parts = split_section(&section, paragraphs, cap);
            debug!(
                total_chars = section.total_chars,
                cap,
                parts = parts.len(),
                "Split oversized section"
            );
            result.extend(parts);
        } else {
            result.push(section);
        }
    }

    result
}

/// Split one section so each part stays within `cap` where possible.
///
/// A paragraph larger than `cap` becomes a part of its own; it is never
/// truncated.
fn split_section(section: &Section, paragraphs: &[Paragraph], cap: usize) -> Vec<Section> {
    let mut parts = Vec::new();
    let mut current = Section::new();

    for &index in &section.paragraph_indices {
        let paragraph = &paragraphs[index];
        if !current.is_empty() && current.total_chars + paragraph.char_count > cap {
            parts.push(std::mem::take(&mut current));
        }
        current.push(index, paragraph);
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunkers::section::build_sections;

    fn body(len: usize, page: u32) -> Paragraph {
        Paragraph::new("y".repeat(len), page, 0)
    }

    #[test]
    fn test_splits_long_section() {
        let paragraphs: Vec<_> = (0..20).map(|_| body(300, 1)).collect();
        let sections = build_sections(&paragraphs);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].total_chars, 6000);

        let parts = split_oversized(sections, &paragraphs, 3800);
        assert!(parts.len() >= 2);
        assert!(parts.iter().all(|p| p.total_chars <= 3800));
        assert_eq!(parts[0].total_chars, 3600);
        assert_eq!(parts[1].total_chars, 2400);

        let indices: Vec<usize> = parts.iter().flat_map(|p| p.paragraph_indices.clone()).collect();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_small_sections_untouched() {
        let paragraphs = vec![body(100, 1), body(100, 2)];
        let sections = build_sections(&paragraphs);
        let parts = split_oversized(sections.clone(), &paragraphs, 3800);
        assert_eq!(parts, sections);
    }

    #[test]
    fn test_giant_paragraph_kept_whole() {
        let paragraphs = vec![body(200, 1), body(5000, 1), body(200, 1)];
        let sections = build_sections(&paragraphs);
        let parts = split_oversized(sections, &paragraphs, 3800);

        let sizes: Vec<_> = parts.iter().map(|p| p.total_chars).collect();
        assert_eq!(sizes, vec![200, 5000, 200]);
    }

    #[test]
    fn test_split_recomputes_pages() {
        // Merged sections can span pages before they are split
        let paragraphs = vec![body(2000, 1), body(2000, 2)];
        let mut section = Section::from_indices(&[0], &paragraphs);
        section.absorb(Section::from_indices(&[1], &paragraphs));

        let parts = split_oversized(vec![section], &paragraphs, 3800);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].pages.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(parts[1].pages.iter().copied().collect::<Vec<_>>(), vec![2]);
    }
}

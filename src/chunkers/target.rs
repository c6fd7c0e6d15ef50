//! Adaptive target sizing from the structural density of pending sections.

use serde::Serialize;

use super::paragraph::Paragraph;
use super::section::Section;
use crate::types::ChunkingConfig;

/// Narrative content needs a heading density below this share of the dense threshold.
const NARRATIVE_HEADING_SHARE: f64 = 0.333;

/// Which sizing rule produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetProfile {
    /// No pending content, or no density signal
    Baseline,
    /// Heading, paragraph or list density above threshold
    Dense,
    /// Few headings and long paragraphs
    Narrative,
}

/// Chunk size for the next packing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdaptiveTarget {
    /// Target chunk size in characters
    pub target: usize,
    /// Overlap in characters; zero unless overlap is enabled. Not applied to chunk text.
    pub overlap: usize,
    pub profile: TargetProfile,
}

/// Structural measurements over a group of sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupDensity {
    pub chars: usize,
    pub headings: usize,
    pub paragraphs: usize,
    pub list_lines: usize,
    pub total_lines: usize,
    /// Headings per 1000 characters
    pub heading_density: f64,
    /// Paragraphs per 1000 characters
    pub paragraph_density: f64,
    /// Share of lines that are list items
    pub list_density: f64,
    pub avg_paragraph_len: f64,
}

impl GroupDensity {
    /// Measure a group of sections.
    pub fn measure(group: &[Section], paragraphs: &[Paragraph]) -> Self {
        let mut density = Self::default();

        for paragraph in group
            .iter()
            .flat_map(|section| section.paragraph_indices.iter())
            .map(|&index| &paragraphs[index])
        {
            density.chars += paragraph.char_count;
            density.paragraphs += 1;
            density.list_lines += paragraph.list_line_count;
            density.total_lines += paragraph.line_count.max(1);
            if paragraph.is_heading {
                density.headings += 1;
            }
        }

        if density.chars > 0 {
            let kilo_chars = density.chars as f64 / 1000.0;
            density.heading_density = density.headings as f64 / kilo_chars;
            density.paragraph_density = density.paragraphs as f64 / kilo_chars;
            density.avg_paragraph_len = density.chars as f64 / density.paragraphs as f64;
        }
        if density.total_lines > 0 {
            density.list_density = density.list_lines as f64 / density.total_lines as f64;
        }

        density
    }
}

/// Compute the target for the next packing decision given the pending group.
pub fn compute_target(
    group: &[Section],
    paragraphs: &[Paragraph],
    config: &ChunkingConfig,
) -> AdaptiveTarget {
    if group.is_empty() {
        return AdaptiveTarget {
            target: config.targets.baseline,
            overlap: 0,
            profile: TargetProfile::Baseline,
        };
    }

    let density = GroupDensity::measure(group, paragraphs);
    let (raw, profile) = raw_target(&density, config);

    let targets = &config.targets;
    let target = raw
        .max(targets.absolute_min as f64)
        .min(targets.absolute_max as f64)
        .round() as usize;

    AdaptiveTarget {
        target,
        overlap: overlap_for(target, config),
        profile,
    }
}

fn raw_target(density: &GroupDensity, config: &ChunkingConfig) -> (f64, TargetProfile) {
    let h = &config.heuristics;
    let t = &config.targets;

    let exceeded: Vec<f64> = [
        (density.heading_density, h.heading_density_high),
        (density.paragraph_density, h.paragraph_density_high),
        (density.list_density, h.list_density_high),
    ]
    .into_iter()
    .filter(|(value, threshold)| value > threshold)
    .map(|(value, threshold)| ((value - threshold) / threshold).clamp(0.0, 1.0))
    .collect();

    if !exceeded.is_empty() {
        let severity = exceeded.into_iter().fold(0.0, f64::max);
        let (min, max) = (t.dense_min as f64, t.dense_max as f64);
        return (max - (max - min) * severity, TargetProfile::Dense);
    }

    let long_len = h.long_paragraph_len as f64;
    if density.heading_density < h.heading_density_high * NARRATIVE_HEADING_SHARE
        && density.avg_paragraph_len > long_len
    {
        let boost = h.long_paragraph_len_max_boost.max(1) as f64;
        let factor = ((density.avg_paragraph_len - long_len) / boost).clamp(0.0, 1.0);
        let (min, max) = (t.narrative_min as f64, t.narrative_max as f64);
        return (min + (max - min) * factor, TargetProfile::Narrative);
    }

    (t.baseline as f64, TargetProfile::Baseline)
}

fn overlap_for(target: usize, config: &ChunkingConfig) -> usize {
    let overlap = &config.overlap;
    if !overlap.enabled {
        return 0;
    }

    let percent = if target <= config.targets.dense_max {
        overlap.small_target_percent
    } else {
        overlap.large_target_percent
    };
    overlap.min_chars.max((target as f64 * percent).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(len: usize) -> Paragraph {
        let p = Paragraph::new(format!("A{}", "b".repeat(len - 1)), 1, 0);
        assert!(p.is_heading);
        p
    }

    fn body(len: usize) -> Paragraph {
        Paragraph::new("z".repeat(len), 1, 0)
    }

    fn group_of(paragraphs: &[Paragraph]) -> Vec<Section> {
        let indices: Vec<usize> = (0..paragraphs.len()).collect();
        vec![Section::from_indices(&indices, paragraphs)]
    }

    fn target_for(paragraphs: &[Paragraph], config: &ChunkingConfig) -> AdaptiveTarget {
        compute_target(&group_of(paragraphs), paragraphs, config)
    }

    #[test]
    fn test_empty_group_is_baseline() {
        let config = ChunkingConfig::default();
        let target = compute_target(&[], &[], &config);
        assert_eq!(
            target,
            AdaptiveTarget { target: 2400, overlap: 0, profile: TargetProfile::Baseline }
        );
    }

    #[test]
    fn test_heading_density_at_double_threshold_hits_dense_min() {
        // 6 headings in 2500 chars: 2.4 headings per 1000 chars
        let mut paragraphs: Vec<_> = (0..6).map(|_| heading(50)).collect();
        paragraphs.push(body(2200));

        let density = GroupDensity::measure(&group_of(&paragraphs), &paragraphs);
        assert_eq!(density.chars, 2500);
        assert_eq!(density.headings, 6);

        let target = target_for(&paragraphs, &ChunkingConfig::default());
        assert_eq!(target.profile, TargetProfile::Dense);
        assert_eq!(target.target, 1400);
    }

    #[test]
    fn test_mild_density_stays_near_dense_max() {
        // 5 paragraphs in 2300 chars: 2.17 per 1000, severity ~0.087
        let paragraphs: Vec<_> = (0..5).map(|_| body(460)).collect();
        let target = target_for(&paragraphs, &ChunkingConfig::default());
        assert_eq!(target.profile, TargetProfile::Dense);
        assert_eq!(target.target, 1674);
    }

    #[test]
    fn test_list_density_is_dense() {
        let list = Paragraph::new(
            (0..10).map(|i| format!("- item number {} with some words", i)).collect::<Vec<_>>().join("\n"),
            1,
            0,
        );
        let paragraphs = vec![list, body(2000)];
        let density = GroupDensity::measure(&group_of(&paragraphs), &paragraphs);
        assert_eq!(density.total_lines, 11);
        assert!(density.list_density > 0.35);

        let target = target_for(&paragraphs, &ChunkingConfig::default());
        assert_eq!(target.profile, TargetProfile::Dense);
        assert!(target.target >= 1400 && target.target <= 1700);
    }

    #[test]
    fn test_narrative_boost() {
        let config = ChunkingConfig::default();

        let half = vec![body(650), body(650)];
        let target = target_for(&half, &config);
        assert_eq!(target.profile, TargetProfile::Narrative);
        assert_eq!(target.target, 3400);

        let full = vec![body(900), body(900)];
        assert_eq!(target_for(&full, &config).target, 3600);
    }

    #[test]
    fn test_baseline_with_moderate_headings() {
        // 1 heading per 1550 chars: not dense, too many headings for narrative
        let paragraphs = vec![heading(50), body(1500)];
        let target = target_for(&paragraphs, &ChunkingConfig::default());
        assert_eq!(target.profile, TargetProfile::Baseline);
        assert_eq!(target.target, 2400);
    }

    #[test]
    fn test_target_clamped_to_absolute_bounds() {
        let mut config = ChunkingConfig::default();
        config.targets.dense_min = 500;
        config.targets.dense_max = 600;
        let dense: Vec<_> = (0..10).map(|_| body(100)).collect();
        assert_eq!(target_for(&dense, &config).target, 900);

        let mut config = ChunkingConfig::default();
        config.targets.absolute_max = 3000;
        let narrative = vec![body(900), body(900)];
        assert_eq!(target_for(&narrative, &config).target, 3000);
    }

    #[test]
    fn test_overlap_sizing() {
        let mut config = ChunkingConfig::default();
        let narrative = vec![body(900), body(900)];
        assert_eq!(target_for(&narrative, &config).overlap, 0);

        config.overlap.enabled = true;
        // 3600 * 0.12
        assert_eq!(target_for(&narrative, &config).overlap, 432);

        // 1400 * 0.08 = 112, raised to the 300 floor
        let mut dense: Vec<_> = (0..6).map(|_| heading(50)).collect();
        dense.push(body(2200));
        let target = target_for(&dense, &config);
        assert_eq!(target.target, 1400);
        assert_eq!(target.overlap, 300);
    }
}

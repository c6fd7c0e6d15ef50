//! Configuration types for chunking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    DEFAULT_ABSOLUTE_MAX, DEFAULT_ABSOLUTE_MIN, DEFAULT_BASELINE_TARGET, DEFAULT_DENSE_MAX,
    DEFAULT_DENSE_MIN, DEFAULT_HEADING_DENSITY_HIGH, DEFAULT_LIST_DENSITY_HIGH,
    DEFAULT_LONG_PARAGRAPH_LEN, DEFAULT_LONG_PARAGRAPH_LEN_MAX_BOOST, DEFAULT_MIN_FILL_FACTOR,
    DEFAULT_NARRATIVE_MAX, DEFAULT_NARRATIVE_MIN, DEFAULT_OVERLAP_LARGE_TARGET_PERCENT,
    DEFAULT_OVERLAP_MIN_CHARS, DEFAULT_OVERLAP_SMALL_TARGET_PERCENT,
    DEFAULT_PARAGRAPH_DENSITY_HIGH, DEFAULT_SMALL_SECTION_THRESHOLD, DEFAULT_SOFT_SPLIT_CAP,
};

/// Prefix of environment variables read by [`ChunkingConfig::load`].
pub const ENV_PREFIX: &str = "CHUNKER";

/// Complete chunking configuration.
///
/// Passed explicitly into every chunker call. Every key is optional and falls
/// back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Whether adaptive chunking is enabled
    pub chunking: ChunkingToggle,

    /// Target size bounds in characters
    pub targets: TargetConfig,

    /// Density thresholds driving target selection
    pub heuristics: HeuristicConfig,

    /// Small section merging
    pub merge: MergeConfig,

    /// Flush hysteresis
    pub flush: FlushConfig,

    /// Oversized section splitting
    pub oversized: OversizedConfig,

    /// Overlap sizing (computed, not applied to chunk text)
    pub overlap: OverlapConfig,
}

/// Switch between adaptive chunking and the single-chunk fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingToggle {
    pub enabled: bool,
}

impl Default for ChunkingToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Target size ranges in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target used when no density signal applies
    pub baseline: usize,
    /// Target for maximally dense content
    pub dense_min: usize,
    /// Target for barely dense content
    pub dense_max: usize,
    /// Target for narrative content just over the long-paragraph threshold
    pub narrative_min: usize,
    /// Target for narrative content at full boost
    pub narrative_max: usize,
    /// Hard floor for any target
    pub absolute_min: usize,
    /// Hard ceiling for any target
    pub absolute_max: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE_TARGET,
            dense_min: DEFAULT_DENSE_MIN,
            dense_max: DEFAULT_DENSE_MAX,
            narrative_min: DEFAULT_NARRATIVE_MIN,
            narrative_max: DEFAULT_NARRATIVE_MAX,
            absolute_min: DEFAULT_ABSOLUTE_MIN,
            absolute_max: DEFAULT_ABSOLUTE_MAX,
        }
    }
}

/// Density thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Headings per 1000 characters above which content is dense
    pub heading_density_high: f64,
    /// Paragraphs per 1000 characters above which content is dense
    pub paragraph_density_high: f64,
    /// Fraction of list lines above which content is dense
    pub list_density_high: f64,
    /// Average paragraph length above which content is narrative
    pub long_paragraph_len: usize,
    /// Excess paragraph length at which the narrative boost saturates
    pub long_paragraph_len_max_boost: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            heading_density_high: DEFAULT_HEADING_DENSITY_HIGH,
            paragraph_density_high: DEFAULT_PARAGRAPH_DENSITY_HIGH,
            list_density_high: DEFAULT_LIST_DENSITY_HIGH,
            long_paragraph_len: DEFAULT_LONG_PARAGRAPH_LEN,
            long_paragraph_len_max_boost: DEFAULT_LONG_PARAGRAPH_LEN_MAX_BOOST,
        }
    }
}

/// Forward merging of undersized sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub small_section_threshold: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            small_section_threshold: DEFAULT_SMALL_SECTION_THRESHOLD,
        }
    }
}

/// Flush hysteresis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlushConfig {
    pub min_fill_factor: f64,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            min_fill_factor: DEFAULT_MIN_FILL_FACTOR,
        }
    }
}

/// Paragraph-aligned splitting of oversized sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OversizedConfig {
    pub soft_split_cap: usize,
}

impl Default for OversizedConfig {
    fn default() -> Self {
        Self {
            soft_split_cap: DEFAULT_SOFT_SPLIT_CAP,
        }
    }
}

/// Overlap sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    pub enabled: bool,
    /// Fraction of the target used when the target is at most `dense_max`
    pub small_target_percent: f64,
    /// Fraction of the target used for larger targets
    pub large_target_percent: f64,
    /// Lower bound on the overlap in characters
    pub min_chars: usize,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            small_target_percent: DEFAULT_OVERLAP_SMALL_TARGET_PERCENT,
            large_target_percent: DEFAULT_OVERLAP_LARGE_TARGET_PERCENT,
            min_chars: DEFAULT_OVERLAP_MIN_CHARS,
        }
    }
}

impl ChunkingConfig {
    /// Load configuration from an optional file layered under `CHUNKER_*`
    /// environment variables, then validate it.
    ///
    /// Nested keys use `__` as separator, e.g. `CHUNKER_TARGETS__BASELINE=2000`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Configuration with adaptive chunking switched off.
    pub fn disabled() -> Self {
        Self {
            chunking: ChunkingToggle { enabled: false },
            ..Default::default()
        }
    }

    /// Check bounds and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.targets;
        if t.absolute_min == 0 {
            return Err(ConfigError::out_of_range(
                "targets.absolute_min",
                t.absolute_min,
                "must be positive",
            ));
        }
        if t.absolute_min > t.absolute_max {
            return Err(ConfigError::inverted("targets.absolute", t.absolute_min, t.absolute_max));
        }
        if t.dense_min > t.dense_max {
            return Err(ConfigError::inverted("targets.dense", t.dense_min, t.dense_max));
        }
        if t.narrative_min > t.narrative_max {
            return Err(ConfigError::inverted(
                "targets.narrative",
                t.narrative_min,
                t.narrative_max,
            ));
        }

        let h = &self.heuristics;
        for (key, value) in [
            ("heuristics.heading_density_high", h.heading_density_high),
            ("heuristics.paragraph_density_high", h.paragraph_density_high),
            ("heuristics.list_density_high", h.list_density_high),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::out_of_range(key, value, "must be positive"));
            }
        }
        if h.long_paragraph_len_max_boost == 0 {
            return Err(ConfigError::out_of_range(
                "heuristics.long_paragraph_len_max_boost",
                h.long_paragraph_len_max_boost,
                "must be positive",
            ));
        }

        if !(0.0..=1.0).contains(&self.flush.min_fill_factor) {
            return Err(ConfigError::out_of_range(
                "flush.min_fill_factor",
                self.flush.min_fill_factor,
                "must be within [0, 1]",
            ));
        }

        if self.oversized.soft_split_cap == 0 {
            return Err(ConfigError::out_of_range(
                "oversized.soft_split_cap",
                self.oversized.soft_split_cap,
                "must be positive",
            ));
        }

        for (key, value) in [
            ("overlap.small_target_percent", self.overlap.small_target_percent),
            ("overlap.large_target_percent", self.overlap.large_target_percent),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::out_of_range(key, value, "must be within [0, 1]"));
            }
        }

        Ok(())
    }
}

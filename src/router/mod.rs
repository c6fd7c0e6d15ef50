//! Chunking strategy router.

use std::sync::Arc;

use crate::chunkers::{AdaptiveChunker, Chunker, ChunkingReport, FallbackChunker};
use crate::error::ConfigError;
use crate::types::{Chunk, ChunkingConfig, PageMap};

static ADAPTIVE: AdaptiveChunker = AdaptiveChunker;
static FALLBACK: FallbackChunker = FallbackChunker;

/// Pick the chunker for a configuration: adaptive unless chunking is disabled.
pub fn select_chunker(config: &ChunkingConfig) -> &'static dyn Chunker {
    if config.chunking.enabled {
        &ADAPTIVE
    } else {
        &FALLBACK
    }
}

/// Router that owns the validated configuration and dispatches documents to
/// the configured chunker.
///
/// Cheap to share across threads; every call is independent.
pub struct ChunkingRouter {
    /// Adaptive chunker (default)
    adaptive_chunker: Arc<AdaptiveChunker>,
    /// Single-chunk formatter (chunking disabled)
    fallback_chunker: Arc<FallbackChunker>,
    /// Immutable configuration
    config: Arc<ChunkingConfig>,
}

impl ChunkingRouter {
    /// Create a router from an already validated configuration.
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            adaptive_chunker: Arc::new(AdaptiveChunker::new()),
            fallback_chunker: Arc::new(FallbackChunker::new()),
            config: Arc::new(config),
        }
    }

    /// Validate the configuration and create a router.
    pub fn try_new(config: ChunkingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Get the chunker selected by the configuration.
    pub fn get_chunker(&self) -> Arc<dyn Chunker> {
        if self.config.chunking.enabled {
            Arc::clone(&self.adaptive_chunker) as Arc<dyn Chunker>
        } else {
            Arc::clone(&self.fallback_chunker) as Arc<dyn Chunker>
        }
    }

    /// Chunk one document with the configured chunker.
    pub fn chunk(&self, pages: &PageMap) -> Vec<Chunk> {
        self.get_chunker().chunk(pages, &self.config)
    }

    /// Chunk one document adaptively and keep diagnostics, regardless of
    /// `chunking.enabled`.
    pub fn chunk_with_report(&self, pages: &PageMap) -> ChunkingReport {
        self.adaptive_chunker.chunk_with_report(pages, &self.config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Get a shared handle to the configuration.
    pub fn shared_config(&self) -> Arc<ChunkingConfig> {
        Arc::clone(&self.config)
    }

    /// Get a chunker by name.
    pub fn get_chunker_by_name(&self, name: &str) -> Option<Arc<dyn Chunker>> {
        match name.to_lowercase().as_str() {
            "adaptive" | "smart" => Some(Arc::clone(&self.adaptive_chunker) as Arc<dyn Chunker>),
            "fallback" | "single" | "disabled" => {
                Some(Arc::clone(&self.fallback_chunker) as Arc<dyn Chunker>)
            }
            _ => None,
        }
    }

    /// List all available chunkers.
    pub fn list_chunkers(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (self.adaptive_chunker.name(), self.adaptive_chunker.description()),
            (self.fallback_chunker.name(), self.fallback_chunker.description()),
        ]
    }
}

impl Default for ChunkingRouter {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pages() -> PageMap {
        vec![
            (1, "the first page is plain prose without any heading."),
            (2, "the second page is plain prose as well."),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_enabled_routes_to_adaptive() {
        let router = ChunkingRouter::default();
        assert_eq!(router.get_chunker().name(), "adaptive");
        assert_eq!(select_chunker(router.config()).name(), "adaptive");
    }

    #[test]
    fn test_disabled_routes_to_fallback() {
        let router = ChunkingRouter::new(ChunkingConfig::disabled());
        assert_eq!(router.get_chunker().name(), "fallback");

        let chunks = router.chunk(&two_pages());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].pages, vec![1, 2]);
        assert_eq!(chunks[0].section_count, 0);
        assert_eq!(
            chunks[0].text,
            format!(
                "{}{}{}",
                "the first page is plain prose without any heading.",
                crate::chunkers::PAGE_SEPARATOR,
                "the second page is plain prose as well."
            )
        );
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let mut config = ChunkingConfig::default();
        config.targets.absolute_max = 100;
        assert!(ChunkingRouter::try_new(config).is_err());
        assert!(ChunkingRouter::try_new(ChunkingConfig::default()).is_ok());
    }

    #[test]
    fn test_lookup_by_name() {
        let router = ChunkingRouter::default();
        assert_eq!(router.get_chunker_by_name("Adaptive").unwrap().name(), "adaptive");
        assert_eq!(router.get_chunker_by_name("fallback").unwrap().name(), "fallback");
        assert!(router.get_chunker_by_name("token").is_none());
        assert_eq!(router.list_chunkers().len(), 2);
    }

    #[test]
    fn test_chunk_pages_matches_router() {
        let config = ChunkingConfig::default();
        let router = ChunkingRouter::new(config.clone());
        assert_eq!(crate::chunk_pages(&two_pages(), &config), router.chunk(&two_pages()));
    }
}

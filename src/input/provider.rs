//! Provider trait and the fallback chain used before chunking.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::PageMap;

/// Text of the single page substituted when no strategy yields any text.
pub const PLACEHOLDER_PAGE_TEXT: &str = "[no extractable text]";

/// A document to extract page text from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Caller-assigned document identifier
    pub id: String,
    /// Where the document lives (path, URL, object key)
    pub location: String,
}

impl DocumentSource {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}

/// Resolves a document to its per-page text.
#[async_trait]
pub trait PageTextProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &'static str;

    /// Extract page text for the given document.
    async fn extract(&self, source: &DocumentSource) -> Result<PageMap>;
}

/// Chains a primary and an optional secondary extraction strategy.
///
/// A strategy that fails or returns only blank pages hands over to the next
/// one. When every strategy is exhausted the document resolves to a single
/// placeholder page, so resolution itself never fails.
pub struct FallbackProvider {
    primary: Arc<dyn PageTextProvider>,
    secondary: Option<Arc<dyn PageTextProvider>>,
}

impl FallbackProvider {
    /// Create a chain with only a primary strategy.
    pub fn new(primary: Arc<dyn PageTextProvider>) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Set the secondary strategy.
    pub fn with_secondary(mut self, secondary: Arc<dyn PageTextProvider>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Resolve a document to a non-empty page map.
    pub async fn resolve(&self, source: &DocumentSource) -> PageMap {
        let strategies = std::iter::once(&self.primary).chain(self.secondary.iter());

        for provider in strategies {
            match provider.extract(source).await {
                Ok(pages) if !pages.is_blank() => {
                    debug!(
                        document = %source.id,
                        provider = provider.name(),
                        pages = pages.len(),
                        "Extracted page text"
                    );
                    return pages;
                }
                Ok(_) => {
                    warn!(document = %source.id, provider = provider.name(), "Provider returned no text");
                }
                Err(e) => {
                    warn!(
                        document = %source.id,
                        provider = provider.name(),
                        error = %e,
                        "Provider failed"
                    );
                }
            }
        }

        warn!(document = %source.id, "All providers exhausted, using placeholder page");
        PageMap::from_iter([(1, PLACEHOLDER_PAGE_TEXT)])
    }
}

#[async_trait]
impl PageTextProvider for FallbackProvider {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn extract(&self, source: &DocumentSource) -> Result<PageMap> {
        Ok(self.resolve(source).await)
    }
}

/// Serves page maps held in memory, keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    documents: HashMap<String, PageMap>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pages of a document.
    pub fn with_document(mut self, id: impl Into<String>, pages: PageMap) -> Self {
        self.documents.insert(id.into(), pages);
        self
    }
}

#[async_trait]
impl PageTextProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn extract(&self, source: &DocumentSource) -> Result<PageMap> {
        self.documents
            .get(&source.id)
            .cloned()
            .ok_or_else(|| anyhow!("No pages registered for document {}", source.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingProvider;

    #[async_trait]
    impl PageTextProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn extract(&self, _source: &DocumentSource) -> Result<PageMap> {
            Err(anyhow!("extraction engine unavailable"))
        }
    }

    fn pages(text: &str) -> PageMap {
        PageMap::from_iter([(1, text)])
    }

    #[tokio::test]
    async fn test_primary_used_when_it_has_text() {
        let primary = StaticProvider::new().with_document("doc", pages("primary text"));
        let secondary = StaticProvider::new().with_document("doc", pages("secondary text"));
        let chain = FallbackProvider::new(Arc::new(primary)).with_secondary(Arc::new(secondary));

        let resolved = chain.resolve(&DocumentSource::new("doc", "mem://doc")).await;
        assert_eq!(resolved.get(1), Some("primary text"));
    }

    #[tokio::test]
    async fn test_secondary_used_after_failure() {
        let secondary = StaticProvider::new().with_document("doc", pages("secondary text"));
        let chain = FallbackProvider::new(Arc::new(FailingProvider)).with_secondary(Arc::new(secondary));

        let resolved = chain.resolve(&DocumentSource::new("doc", "mem://doc")).await;
        assert_eq!(resolved.get(1), Some("secondary text"));
    }

    #[tokio::test]
    async fn test_secondary_used_after_blank_pages() {
        let primary = StaticProvider::new().with_document("doc", pages("   \n\n"));
        let secondary = StaticProvider::new().with_document("doc", pages("secondary text"));
        let chain = FallbackProvider::new(Arc::new(primary)).with_secondary(Arc::new(secondary));

        let resolved = chain.extract(&DocumentSource::new("doc", "mem://doc")).await.unwrap();
        assert_eq!(resolved.get(1), Some("secondary text"));
    }

    #[tokio::test]
    async fn test_placeholder_when_exhausted() {
        let chain = FallbackProvider::new(Arc::new(FailingProvider))
            .with_secondary(Arc::new(StaticProvider::new()));

        let resolved = chain.resolve(&DocumentSource::new("missing", "mem://missing")).await;
        assert_eq!(resolved.page_numbers(), vec![1]);
        assert_eq!(resolved.get(1), Some(PLACEHOLDER_PAGE_TEXT));
    }
}

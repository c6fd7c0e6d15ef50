//! Sink trait for delivering chunks to a search/index backend.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::Chunk;

/// Caller-supplied metadata attached to every chunk of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Human-readable document title
    pub title: String,
    /// Stable identifier that chunk identifiers are derived from
    pub base_id: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DocumentMetadata {
    pub fn new(title: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base_id: base_id.into(),
            tags: Vec::new(),
        }
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Build the identifier of a chunk from its document's base identifier.
pub fn chunk_document_id(base_id: &str, chunk_number: usize) -> String {
    format!("{}-chunk-{}", base_id, chunk_number)
}

/// A chunk as stored by a sink, with its derived identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub id: String,
    /// Base identifier of the owning document
    pub document_id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub chunk: Chunk,
}

impl IndexedChunk {
    /// Attach document metadata to a chunk.
    pub fn new(metadata: &DocumentMetadata, chunk: Chunk) -> Self {
        Self {
            id: chunk_document_id(&metadata.base_id, chunk.chunk_number),
            document_id: metadata.base_id.clone(),
            title: metadata.title.clone(),
            tags: metadata.tags.clone(),
            chunk,
        }
    }
}

/// Receives the chunks of a document for storage or indexing.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Deliver all chunks of one document. Returns the number stored.
    async fn deliver(&self, metadata: &DocumentMetadata, chunks: &[Chunk]) -> Result<usize>;
}

/// Sink that keeps indexed chunks in memory.
///
/// Re-delivering a document replaces its whole previous chunk set.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RwLock<Vec<IndexedChunk>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored chunks in delivery order.
    pub async fn records(&self) -> Vec<IndexedChunk> {
        self.records.read().await.clone()
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn deliver(&self, metadata: &DocumentMetadata, chunks: &[Chunk]) -> Result<usize> {
        let mut records = self.records.write().await;
        records.retain(|existing| existing.document_id != metadata.base_id);
        records.extend(chunks.iter().map(|chunk| IndexedChunk::new(metadata, chunk.clone())));

        debug!(document = %metadata.base_id, chunks = chunks.len(), "Stored chunks in memory");
        Ok(chunks.len())
    }
}

//! Batch processing utilities for chunking many documents.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::input::{DocumentSource, PageTextProvider};
use crate::output::{DocumentMetadata, DocumentSink};
use crate::router::ChunkingRouter;
use crate::types::{Chunk, PageMap};

/// Configuration for batch processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum documents to process concurrently
    pub concurrency: usize,
    /// Whether to continue on individual document failures
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            continue_on_error: true,
        }
    }
}

/// A document whose page text is already available.
#[derive(Debug, Clone)]
pub struct DocumentPages {
    pub metadata: DocumentMetadata,
    pub pages: PageMap,
}

impl DocumentPages {
    pub fn new(metadata: DocumentMetadata, pages: PageMap) -> Self {
        Self { metadata, pages }
    }
}

/// The chunks produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunks {
    pub metadata: DocumentMetadata,
    pub chunks: Vec<Chunk>,
}

/// A document to resolve through a provider before chunking.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub metadata: DocumentMetadata,
    pub source: DocumentSource,
}

impl DocumentRequest {
    pub fn new(metadata: DocumentMetadata, source: DocumentSource) -> Self {
        Self { metadata, source }
    }
}

/// Result of batch processing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total_documents: usize,
    pub processed_documents: usize,
    pub failed_documents: usize,
    pub total_chunks: usize,
    pub errors: Vec<BatchError>,
}

/// Error during batch processing.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub document_id: String,
    pub error: String,
}

/// Batch processor for chunking many independent documents.
///
/// Documents are chunked on tokio's blocking pool with bounded concurrency.
/// Results always come back in input order.
pub struct BatchProcessor {
    router: Arc<ChunkingRouter>,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(router: Arc<ChunkingRouter>, config: BatchConfig) -> Self {
        Self { router, config }
    }

    /// Get the batch configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process a batch of documents and return the chunks of each.
    pub async fn process_batch(
        &self,
        documents: Vec<DocumentPages>,
    ) -> Result<(Vec<DocumentChunks>, BatchResult)> {
        let mut result = BatchResult {
            total_documents: documents.len(),
            ..BatchResult::default()
        };
        let mut output = Vec::with_capacity(documents.len());

        info!(total_documents = result.total_documents, "Starting batch processing");

        let results = self.chunk_documents(documents);
        futures::pin_mut!(results);

        while let Some((document_id, outcome)) = results.next().await {
            match outcome {
                Ok(document) => {
                    result.total_chunks += document.chunks.len();
                    result.processed_documents += 1;
                    output.push(document);
                }
                Err(e) => {
                    self.record_failure(&mut result, document_id, e)?;
                }
            }
        }

        info!(
            processed = result.processed_documents,
            failed = result.failed_documents,
            chunks = result.total_chunks,
            "Batch processing complete"
        );

        Ok((output, result))
    }

    /// Process a batch with streaming output, one message per document.
    pub async fn process_batch_streaming(
        &self,
        documents: Vec<DocumentPages>,
        sender: mpsc::Sender<DocumentChunks>,
    ) -> Result<BatchResult> {
        let mut result = BatchResult {
            total_documents: documents.len(),
            ..BatchResult::default()
        };

        let results = self.chunk_documents(documents);
        futures::pin_mut!(results);

        while let Some((document_id, outcome)) = results.next().await {
            match outcome {
                Ok(document) => {
                    result.total_chunks += document.chunks.len();
                    result.processed_documents += 1;

                    if sender.send(document).await.is_err() {
                        warn!("Receiver dropped, stopping batch processing");
                        break;
                    }
                }
                Err(e) => {
                    self.record_failure(&mut result, document_id, e)?;
                }
            }
        }

        Ok(result)
    }

    /// Resolve, chunk and deliver a batch of documents.
    pub async fn ingest(
        &self,
        requests: Vec<DocumentRequest>,
        provider: &dyn PageTextProvider,
        sink: &dyn DocumentSink,
    ) -> Result<BatchResult> {
        let mut result = BatchResult {
            total_documents: requests.len(),
            ..BatchResult::default()
        };

        info!(
            total_documents = result.total_documents,
            provider = provider.name(),
            sink = sink.name(),
            "Starting ingestion"
        );

        let router = Arc::clone(&self.router);
        let results = stream::iter(requests)
            .map(move |request| {
                let router = Arc::clone(&router);
                async move {
                    let document_id = request.metadata.base_id.clone();
                    let outcome: Result<usize> = async {
                        let pages = provider
                            .extract(&request.source)
                            .await
                            .with_context(|| format!("Failed to extract {}", request.source.location))?;
                        let chunks = chunk_on_pool(router, pages).await?;
                        sink.deliver(&request.metadata, &chunks)
                            .await
                            .with_context(|| format!("Failed to deliver {}", request.metadata.base_id))
                    }
                    .await;
                    (document_id, outcome)
                }
            })
            .buffered(self.concurrency());
        futures::pin_mut!(results);

        while let Some((document_id, outcome)) = results.next().await {
            match outcome {
                Ok(stored) => {
                    debug!(document = %document_id, stored, "Document ingested");
                    result.total_chunks += stored;
                    result.processed_documents += 1;
                }
                Err(e) => {
                    self.record_failure(&mut result, document_id, e)?;
                }
            }
        }

        info!(
            processed = result.processed_documents,
            failed = result.failed_documents,
            chunks = result.total_chunks,
            "Ingestion complete"
        );

        Ok(result)
    }

    /// Chunk documents on the blocking pool, yielding results in input order.
    fn chunk_documents(
        &self,
        documents: Vec<DocumentPages>,
    ) -> impl Stream<Item = (String, Result<DocumentChunks>)> {
        let router = Arc::clone(&self.router);
        stream::iter(documents)
            .map(move |document| {
                let router = Arc::clone(&router);
                async move {
                    let document_id = document.metadata.base_id.clone();
                    let DocumentPages { metadata, pages } = document;
                    let outcome = chunk_on_pool(router, pages)
                        .await
                        .map(|chunks| DocumentChunks { metadata, chunks });
                    (document_id, outcome)
                }
            })
            .buffered(self.concurrency())
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Record a failed document, or abort when errors are fatal.
    fn record_failure(
        &self,
        result: &mut BatchResult,
        document_id: String,
        error: anyhow::Error,
    ) -> Result<()> {
        if !self.config.continue_on_error {
            return Err(error.context(format!("Document {} failed", document_id)));
        }

        warn!(document = %document_id, error = %error, "Failed to process document");
        result.errors.push(BatchError {
            document_id,
            error: format!("{:#}", error),
        });
        result.failed_documents += 1;
        Ok(())
    }
}

/// Chunk one document on the blocking pool.
async fn chunk_on_pool(router: Arc<ChunkingRouter>, pages: PageMap) -> Result<Vec<Chunk>> {
    let chunks = tokio::task::spawn_blocking(move || router.chunk(&pages))
        .await
        .context("Chunking task panicked")?;
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StaticProvider;
    use crate::output::MemorySink;
    use crate::types::ChunkingConfig;
    use pretty_assertions::assert_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("page_chunker=debug")
            .try_init();
    }

    fn create_processor(config: BatchConfig) -> BatchProcessor {
        BatchProcessor::new(Arc::new(ChunkingRouter::default()), config)
    }

    fn create_document(id: &str, text: &str) -> DocumentPages {
        DocumentPages::new(
            DocumentMetadata::new(format!("Title {}", id), id),
            PageMap::from_iter([(1, text)]),
        )
    }

    fn create_documents() -> Vec<DocumentPages> {
        vec![
            create_document("alpha", "alpha text on a single page."),
            create_document("beta", "beta text on a single page."),
            create_document("gamma", "gamma text on a single page."),
            create_document("delta", "delta text on a single page."),
        ]
    }

    #[tokio::test]
    async fn test_process_batch_preserves_order() {
        init_tracing();
        let processor = create_processor(BatchConfig {
            concurrency: 3,
            ..BatchConfig::default()
        });

        let (documents, result) = processor.process_batch(create_documents()).await.unwrap();

        let ids: Vec<_> = documents.iter().map(|d| d.metadata.base_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta", "gamma", "delta"]);
        assert_eq!(result.total_documents, 4);
        assert_eq!(result.processed_documents, 4);
        assert_eq!(result.failed_documents, 0);
        assert_eq!(result.total_chunks, 4);
        assert_eq!(documents[1].chunks[0].text, "beta text on a single page.");
    }

    #[tokio::test]
    async fn test_process_batch_matches_direct_chunking() {
        let processor = create_processor(BatchConfig::default());
        let document = create_document("doc", "some plain text on page one.");
        let expected = crate::chunk_pages(&document.pages, &ChunkingConfig::default());

        let (documents, _) = processor.process_batch(vec![document]).await.unwrap();
        assert_eq!(documents[0].chunks, expected);
    }

    #[tokio::test]
    async fn test_process_batch_empty() {
        let processor = create_processor(BatchConfig::default());
        let (documents, result) = processor.process_batch(Vec::new()).await.unwrap();

        assert!(documents.is_empty());
        assert_eq!(result.total_documents, 0);
        assert_eq!(result.total_chunks, 0);
    }

    #[tokio::test]
    async fn test_streaming_sends_each_document() {
        init_tracing();
        let processor = create_processor(BatchConfig {
            concurrency: 2,
            ..BatchConfig::default()
        });
        let (sender, mut receiver) = mpsc::channel(8);

        let result = processor
            .process_batch_streaming(create_documents(), sender)
            .await
            .unwrap();

        let mut received = Vec::new();
        while let Some(document) = receiver.recv().await {
            received.push(document.metadata.base_id);
        }
        assert_eq!(received, vec!["alpha", "beta", "gamma", "delta"]);
        assert_eq!(result.processed_documents, 4);
    }

    #[tokio::test]
    async fn test_streaming_stops_when_receiver_dropped() {
        let processor = create_processor(BatchConfig::default());
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);

        let result = processor
            .process_batch_streaming(create_documents(), sender)
            .await
            .unwrap();
        assert_eq!(result.processed_documents, 1);
    }

    #[tokio::test]
    async fn test_ingest_delivers_to_sink() {
        init_tracing();
        let processor = create_processor(BatchConfig::default());
        let provider = StaticProvider::new()
            .with_document("a", PageMap::from_iter([(1, "first document text.")]))
            .with_document("b", PageMap::from_iter([(1, "second document text.")]));
        let sink = MemorySink::new();

        let requests = vec![
            DocumentRequest::new(DocumentMetadata::new("A", "a"), DocumentSource::new("a", "mem://a")),
            DocumentRequest::new(DocumentMetadata::new("B", "b"), DocumentSource::new("b", "mem://b")),
        ];
        let result = processor.ingest(requests, &provider, &sink).await.unwrap();

        assert_eq!(result.processed_documents, 2);
        assert_eq!(result.total_chunks, 2);
        let ids: Vec<_> = sink.records().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a-chunk-0", "b-chunk-0"]);
    }

    #[tokio::test]
    async fn test_ingest_records_failures() {
        let processor = create_processor(BatchConfig::default());
        let provider = StaticProvider::new()
            .with_document("a", PageMap::from_iter([(1, "first document text.")]));
        let sink = MemorySink::new();

        let requests = vec![
            DocumentRequest::new(DocumentMetadata::new("A", "a"), DocumentSource::new("a", "mem://a")),
            DocumentRequest::new(
                DocumentMetadata::new("Missing", "missing"),
                DocumentSource::new("missing", "mem://missing"),
            ),
        ];
        let result = processor.ingest(requests, &provider, &sink).await.unwrap();

        assert_eq!(result.processed_documents, 1);
        assert_eq!(result.failed_documents, 1);
        assert_eq!(result.errors[0].document_id, "missing");
        assert!(result.errors[0].error.contains("mem://missing"));
        assert_eq!(sink.len().await, 1);
    }

    #[tokio::test]
    async fn test_ingest_aborts_without_continue_on_error() {
        let processor = create_processor(BatchConfig {
            concurrency: 1,
            continue_on_error: false,
        });
        let provider = StaticProvider::new();
        let sink = MemorySink::new();

        let requests = vec![DocumentRequest::new(
            DocumentMetadata::new("Missing", "missing"),
            DocumentSource::new("missing", "mem://missing"),
        )];
        let err = processor.ingest(requests, &provider, &sink).await.unwrap_err();

        assert!(format!("{:#}", err).contains("missing"));
        assert!(sink.is_empty().await);
    }
}

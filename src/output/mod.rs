//! Output sinks for produced chunks.

mod sink;

pub use sink::{chunk_document_id, DocumentMetadata, DocumentSink, IndexedChunk, MemorySink};

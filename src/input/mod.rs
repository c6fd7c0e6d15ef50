//! Page text providers.
//!
//! Text extraction itself lives outside this crate; providers only have to
//! resolve a document to a [`PageMap`](crate::PageMap) before chunking.

mod provider;

pub use provider::{
    DocumentSource, FallbackProvider, PageTextProvider, StaticProvider, PLACEHOLDER_PAGE_TEXT,
};

//! Key/value document store keyed by collection and document id.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

pub type Document = Map<String, Value>;

/// Per-document atomic set/update/get. No cross-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// Creates or overwrites the whole document.
    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError>;

    /// Merges top-level fields into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Document)
        -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
}

/// Shallow merge: each field in `fields` replaces the same key in `document`.
pub fn merge_fields(document: &mut Document, fields: Document) {
    for (key, value) in fields {
        document.insert(key, value);
    }
}

/// Ids become file names and URL segments, so separators and `..` are refused.
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

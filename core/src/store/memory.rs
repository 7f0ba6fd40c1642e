//! Process-local document store. Backs mock-services mode and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{merge_fields, Document, DocumentStore};
use crate::error::StoreError;

#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<(String, String), Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.documents
            .read()
            .await
            .keys()
            .filter(|(c, _)| c == collection)
            .count()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        tracing::debug!(target: "governor.store", collection, id, "memory set");
        self.documents
            .write()
            .await
            .insert((collection.to_string(), id.to_string()), document);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        tracing::debug!(target: "governor.store", collection, id, "memory update");
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(&(collection.to_string(), id.to_string()))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_fields(document, fields);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }
}

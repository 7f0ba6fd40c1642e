use std::sync::Arc;

use crate::error::StoreError;
use crate::execution::{ExecutionRecord, ExecutionUpdate};
use crate::store::{Document, DocumentStore};

/// Execution-record persistence shared by the strategies and the status
/// query. Cheap to clone into completion tasks.
#[derive(Clone)]
pub struct ExecutionLedger {
    store: Arc<dyn DocumentStore>,
    collection: Arc<str>,
}

impl ExecutionLedger {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: Arc::from(collection.into()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// `<collection>/<execution_id>`
    pub fn path(&self, execution_id: &str) -> String {
        format!("{}/{}", self.collection, execution_id)
    }

    /// Initial write. Callers treat failure as fatal.
    pub async fn create(&self, record: &ExecutionRecord) -> Result<(), StoreError> {
        let document = record.to_document()?;
        self.store
            .set(&self.collection, &record.execution_id, document)
            .await
    }

    pub async fn advance(
        &self,
        execution_id: &str,
        update: &ExecutionUpdate,
    ) -> Result<(), StoreError> {
        let fields = update.to_fields()?;
        self.store
            .update(&self.collection, execution_id, fields)
            .await
    }

    /// Completion-path update. A failure is logged and dropped; the record
    /// keeps its previous status.
    pub async fn settle(&self, execution_id: &str, update: &ExecutionUpdate) {
        if let Err(err) = self.advance(execution_id, update).await {
            let status = update
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default();
            tracing::error!(
                target: "governor.dispatch",
                execution_id = %execution_id,
                status = %status,
                error = %err,
                "Failed to update execution status"
            );
        }
    }

    pub async fn fetch(&self, execution_id: &str) -> Result<Option<Document>, StoreError> {
        self.store.get(&self.collection, execution_id).await
    }
}

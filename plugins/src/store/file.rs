use async_trait::async_trait;
use governor_core::api::{is_valid_document_id, merge_fields, Document, DocumentStore, StoreError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One pretty-printed JSON file per document at
/// `<root>/<collection>/<id>.json`.
pub struct FileStore {
    root: PathBuf,
    // Serializes read-modify-write in `update`.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_document_id(collection) {
            return Err(StoreError::InvalidId(collection.to_string()));
        }
        if !is_valid_document_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    async fn read(&self, path: &Path, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::backend(err)),
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn write(&self, path: &Path, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::backend)?;
        }
        let raw = serde_json::to_string_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await.map_err(StoreError::backend)?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(StoreError::backend)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        let path = self.document_path(collection, id)?;
        tracing::debug!(target: "governor.store", path = %path.display(), "file set");
        let _guard = self.write_lock.lock().await;
        self.write(&path, &document).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let path = self.document_path(collection, id)?;
        tracing::debug!(target: "governor.store", path = %path.display(), "file update");
        let _guard = self.write_lock.lock().await;
        let mut document = self
            .read(&path, collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_fields(&mut document, fields);
        self.write(&path, &document).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        // Ids that could never have been written are simply absent.
        let Ok(path) = self.document_path(collection, id) else {
            return Ok(None);
        };
        self.read(&path, collection, id).await
    }
}

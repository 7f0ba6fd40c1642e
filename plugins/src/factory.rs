use anyhow::Result;
use std::sync::Arc;

use governor_core::api::{
    AppConfig, DocumentStore, HttpBackend, MemoryStore, StoreProvider, WorkflowClient,
    WorkflowProvider,
};

use crate::backend::ReqwestHttpBackend;
use crate::store::FileStore;
use crate::workflow::{MockWorkflowClient, ServiceWorkflowClient};

pub fn build_store(cfg: &AppConfig) -> Arc<dyn DocumentStore> {
    match &cfg.store.provider {
        StoreProvider::Memory => Arc::new(MemoryStore::new()),
        StoreProvider::File(file_cfg) => Arc::new(FileStore::new(&file_cfg.directory)),
    }
}

pub fn build_http_backend(cfg: &AppConfig) -> Result<Arc<dyn HttpBackend>> {
    Ok(Arc::new(ReqwestHttpBackend::new(
        cfg.auth.governor_key.clone(),
        cfg.http_backend.timeout_ms,
    )?))
}

pub fn build_workflow(cfg: &AppConfig) -> Result<Arc<dyn WorkflowClient>> {
    match &cfg.workflow.provider {
        WorkflowProvider::Mock => Ok(Arc::new(MockWorkflowClient)),
        WorkflowProvider::Service(svc_cfg) => Ok(Arc::new(ServiceWorkflowClient::new(
            svc_cfg.base_url.clone(),
            svc_cfg.access_token.clone(),
            svc_cfg.timeout_ms,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_core::api::{FileStoreConfig, WorkflowServiceConfig};

    #[test]
    fn test_default_config_builds_local_services() {
        let cfg = AppConfig::default();
        assert_eq!(build_store(&cfg).name(), "memory");
        assert_eq!(build_workflow(&cfg).unwrap().name(), "mock");
        assert_eq!(build_http_backend(&cfg).unwrap().name(), "reqwest");
    }

    #[test]
    fn test_configured_providers() {
        let mut cfg = AppConfig::default();
        cfg.store.provider = StoreProvider::File(FileStoreConfig::default());
        cfg.workflow.provider = WorkflowProvider::Service(WorkflowServiceConfig::default());
        assert_eq!(build_store(&cfg).name(), "file");
        assert_eq!(build_workflow(&cfg).unwrap().name(), "workflow_service");
    }
}

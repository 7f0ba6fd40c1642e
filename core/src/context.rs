use crate::backend::{HttpBackend, WorkflowClient};
use crate::config::AppConfig;
use crate::registry::Registry;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Collaborators injected into the dispatch router.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub http_backend: Arc<dyn HttpBackend>,
    pub workflow: Arc<dyn WorkflowClient>,
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &AppConfig) -> anyhow::Result<Services>;
}

/// Everything loaded once at process start.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    registry: Arc<Registry>,
    services_factory: Option<Arc<dyn ServicesFactory>>,
}

impl AppContext {
    pub fn new(
        cfg: AppConfig,
        registry: Registry,
        services_factory: Option<Arc<dyn ServicesFactory>>,
    ) -> Self {
        Self {
            cfg,
            registry: Arc::new(registry),
            services_factory,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub async fn build_services(&self) -> anyhow::Result<Services> {
        let Some(factory) = self.services_factory.as_ref() else {
            anyhow::bail!("services_factory missing (cannot build store/backends)");
        };
        factory.build_services(&self.cfg).await
    }
}

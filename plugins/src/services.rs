//! ServicesFactory 实现：从配置构建 store / http backend / workflow client，供 CLI 复用。
use async_trait::async_trait;
use governor_core::api::{AppConfig, Services, ServicesFactory};

use crate::factory;

pub struct PluginServicesFactory;

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> anyhow::Result<Services> {
        let store = factory::build_store(cfg);
        let http_backend = factory::build_http_backend(cfg)?;
        let workflow = factory::build_workflow(cfg)?;
        tracing::info!(
            target: "governor.services",
            store = store.name(),
            http_backend = http_backend.name(),
            workflow = workflow.name(),
            "services built"
        );
        Ok(Services {
            store,
            http_backend,
            workflow,
        })
    }
}

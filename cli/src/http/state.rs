//! HTTP服务器状态管理

use governor_core::api::{AppConfig, DispatchRouter};
use std::sync::Arc;

/// 应用状态（在所有handlers间共享）
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DispatchRouter>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(router: DispatchRouter, config: AppConfig) -> Self {
        Self {
            router: Arc::new(router),
            config: Arc::new(config),
        }
    }
}

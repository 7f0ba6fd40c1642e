mod load;
mod types;

pub use load::{apply_env_overrides, get_governor_data_dir, load, LOCAL_CONFIG_FILE};
pub use types::{
    AppConfig, AuthConfig, CorsConfig, FileStoreConfig, HttpBackendConfig, LoggingConfig,
    RegistryConfig, ServerConfig, StoreConfig, StoreProvider, WorkflowConfig, WorkflowProvider,
    WorkflowServiceConfig,
};

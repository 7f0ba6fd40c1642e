use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub http_backend: HttpBackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Local mode: in-process store and mock workflow service.
    pub fn use_mock_services(&mut self) {
        self.store.provider = StoreProvider::Memory;
        self.workflow.provider = WorkflowProvider::Mock;
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.store.provider, StoreProvider::Memory)
            && matches!(self.workflow.provider, WorkflowProvider::Mock)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected in `header`.
    #[serde(default = "default_governor_key")]
    pub governor_key: String,
    #[serde(default = "default_auth_header")]
    pub header: String,
}

fn default_governor_key() -> String {
    "dev-governor-key".to_string()
}

fn default_auth_header() -> String {
    "X-GOVERNOR-KEY".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            governor_key: default_governor_key(),
            header: default_auth_header(),
        }
    }
}

impl AuthConfig {
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|key| key == self.governor_key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

fn default_allow_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: String,
}

fn default_registry_path() -> String {
    "registry.json".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoreConfigDoc")]
pub struct StoreConfig {
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(flatten)]
    pub provider: StoreProvider,
}

/// On-disk `[store]` table; `provider` may be omitted.
#[derive(Deserialize)]
struct StoreConfigDoc {
    #[serde(default = "default_collection")]
    collection: String,
    #[serde(default)]
    provider: StoreKind,
    #[serde(default = "default_store_directory")]
    directory: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoreKind {
    #[default]
    Memory,
    File,
}

impl From<StoreConfigDoc> for StoreConfig {
    fn from(doc: StoreConfigDoc) -> Self {
        let provider = match doc.provider {
            StoreKind::Memory => StoreProvider::Memory,
            StoreKind::File => StoreProvider::File(FileStoreConfig {
                directory: doc.directory,
            }),
        };
        Self {
            collection: doc.collection,
            provider,
        }
    }
}

fn default_collection() -> String {
    "executions".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            provider: StoreProvider::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum StoreProvider {
    #[default]
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File(FileStoreConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    #[serde(default = "default_store_directory")]
    pub directory: String,
}

fn default_store_directory() -> String {
    "./data".to_string()
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            directory: default_store_directory(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "WorkflowConfigDoc")]
pub struct WorkflowConfig {
    #[serde(flatten)]
    pub provider: WorkflowProvider,
}

/// On-disk `[workflow]` table; `provider` may be omitted.
#[derive(Deserialize)]
struct WorkflowConfigDoc {
    #[serde(default)]
    provider: WorkflowKind,
    #[serde(default = "default_workflow_url")]
    base_url: String,
    #[serde(default)]
    access_token: String,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WorkflowKind {
    #[default]
    Mock,
    Service,
}

impl From<WorkflowConfigDoc> for WorkflowConfig {
    fn from(doc: WorkflowConfigDoc) -> Self {
        let provider = match doc.provider {
            WorkflowKind::Mock => WorkflowProvider::Mock,
            WorkflowKind::Service => WorkflowProvider::Service(WorkflowServiceConfig {
                base_url: doc.base_url,
                access_token: doc.access_token,
                timeout_ms: doc.timeout_ms,
            }),
        };
        Self { provider }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum WorkflowProvider {
    #[default]
    #[serde(rename = "mock")]
    Mock,
    #[serde(rename = "service")]
    Service(WorkflowServiceConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowServiceConfig {
    #[serde(default = "default_workflow_url")]
    pub base_url: String,
    /// Bearer token; empty sends no Authorization header.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_workflow_url() -> String {
    "https://workflowexecutions.googleapis.com".to_string()
}

impl Default for WorkflowServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_workflow_url(),
            access_token: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "governor_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

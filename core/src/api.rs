//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `governor_core::api` instead of reaching into internal modules.

pub use crate::backend::{HttpBackend, WorkflowClient, WorkflowExecution};
pub use crate::config::{
    load, AppConfig, AuthConfig, CorsConfig, FileStoreConfig, HttpBackendConfig,
    LoggingConfig, RegistryConfig, ServerConfig, StoreConfig, StoreProvider, WorkflowConfig,
    WorkflowProvider, WorkflowServiceConfig,
};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::dispatch::{
    DispatchRouter, ExecutionLedger, RouteOutcome, RouteRequest, RouteRequestBody,
};
pub use crate::error::{
    CliError, DispatchError, RouteError, StatusError, StoreError, ValidationError,
};
pub use crate::execution::{
    CommanderState, ExecutionRecord, ExecutionStatus, ExecutionUpdate, COMMANDER_COLLECTION,
    COMMANDER_DOC_ID,
};
pub use crate::registry::{
    AgentConfig, DispatchTarget, InternalCommand, Registry, RegistryError, SlotAgents,
};
pub use crate::status::{ExecutionStatusView, StatusQuery};
pub use crate::store::{is_valid_document_id, merge_fields, Document, DocumentStore, MemoryStore};

//! Outbound collaborators invoked by the dispatch strategies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote HTTP backend for `http(s)://` agents.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    fn name(&self) -> &str;

    /// POSTs `payload` to `url`; any transport failure or non-2xx status is
    /// an error. Returns the decoded response body.
    async fn invoke(&self, url: &str, payload: &Value) -> anyhow::Result<Value>;
}

/// Handle returned by the workflow service for a submitted execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// External workflow-execution service.
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    fn name(&self) -> &str;

    /// Submits one execution of the workflow at `parent` with a serialized
    /// JSON `argument`.
    async fn create_execution(
        &self,
        parent: &str,
        argument: String,
    ) -> anyhow::Result<WorkflowExecution>;
}

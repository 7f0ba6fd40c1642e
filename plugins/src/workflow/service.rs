use async_trait::async_trait;
use governor_core::api::{WorkflowClient, WorkflowExecution};
use serde_json::json;

use crate::http_client::{build_client, decode, send};

const SERVICE: &str = "workflow service";

/// Workflow Executions REST client.
#[derive(Clone)]
pub struct ServiceWorkflowClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ServiceWorkflowClient {
    pub fn new(base_url: String, access_token: String, timeout_ms: u64) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_client(timeout_ms)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn executions_url(&self, parent: &str) -> String {
        format!("{}/v1/{}/executions", self.base_url, parent.trim_matches('/'))
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.access_token.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.access_token)
        }
    }
}

#[async_trait]
impl WorkflowClient for ServiceWorkflowClient {
    fn name(&self) -> &str {
        "workflow_service"
    }

    async fn create_execution(
        &self,
        parent: &str,
        argument: String,
    ) -> anyhow::Result<WorkflowExecution> {
        let url = self.executions_url(parent);
        tracing::debug!(
            target: "governor.workflow",
            stage = "workflow.create.in",
            url = %url,
            argument_len = argument.len()
        );
        let req = self.http.post(&url).json(&json!({ "argument": argument }));
        let body = send(SERVICE, &url, self.auth(req)).await?;
        let execution: WorkflowExecution = decode(SERVICE, &url, &body)?;
        tracing::debug!(
            target: "governor.workflow",
            stage = "workflow.create.out",
            execution = %execution.name
        );
        Ok(execution)
    }
}

use async_trait::async_trait;
use governor_core::api::{WorkflowClient, WorkflowExecution};
use uuid::Uuid;

/// Accepts every submission locally. Used in mock-services mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockWorkflowClient;

#[async_trait]
impl WorkflowClient for MockWorkflowClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_execution(
        &self,
        parent: &str,
        argument: String,
    ) -> anyhow::Result<WorkflowExecution> {
        let name = format!("{}/executions/mock_exec_{}", parent, Uuid::new_v4());
        tracing::info!(
            target: "governor.workflow",
            parent = %parent,
            argument_len = argument.len(),
            "[MOCK] Creating execution {}",
            name
        );
        Ok(WorkflowExecution {
            name,
            state: Some("ACTIVE".to_string()),
        })
    }
}

use std::sync::Arc;
use tracing::Instrument;

use crate::backend::WorkflowClient;
use crate::error::{DispatchError, StoreError};
use crate::execution::{new_execution_id, ExecutionRecord, ExecutionUpdate};

use super::{DispatchRequest, Dispatched, ExecutionLedger};

/// Submits the request payload to the workflow service as a serialized
/// argument. The record waits with a null `workflow_execution_name` until the
/// service answers.
pub struct WorkflowStrategy {
    ledger: ExecutionLedger,
    client: Arc<dyn WorkflowClient>,
}

impl WorkflowStrategy {
    pub fn new(ledger: ExecutionLedger, client: Arc<dyn WorkflowClient>) -> Self {
        Self { ledger, client }
    }

    pub async fn dispatch(
        &self,
        req: DispatchRequest<'_>,
        parent: &str,
    ) -> Result<Dispatched, StoreError> {
        let execution_id = new_execution_id("exec");
        let record = ExecutionRecord::queued(&execution_id, req.request, req.request_id)
            .with_workflow_stub(parent)
            .awaiting_workflow();
        if let Err(err) = self.ledger.create(&record).await {
            tracing::error!(
                target: "governor.dispatch",
                request_id = %req.request_id,
                error = %err,
                "Failed to create workflow execution record"
            );
            return Err(err);
        }

        let ledger = self.ledger.clone();
        let client = Arc::clone(&self.client);
        let argument = req.request.payload.to_string();
        let parent = parent.to_string();
        let id = execution_id.clone();
        let span = tracing::info_span!("workflow_submission", execution_id = %execution_id);

        let completion = tokio::spawn(
            async move {
                let update = match client.create_execution(&parent, argument).await {
                    Ok(execution) => {
                        tracing::info!(
                            target: "governor.dispatch",
                            workflow_execution = %execution.name,
                            "Workflow execution created"
                        );
                        ExecutionUpdate::workflow_started(&execution.name, execution.state.as_deref())
                    }
                    Err(err) => {
                        tracing::error!(
                            target: "governor.dispatch",
                            parent = %parent,
                            error = %err,
                            "Workflow execution failed"
                        );
                        ExecutionUpdate::failed(&DispatchError::WorkflowSubmission(err.to_string()))
                    }
                };
                ledger.settle(&id, &update).await;
            }
            .instrument(span),
        );

        Ok(Dispatched {
            execution_id,
            completion: Some(completion),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{request, FailingStore, FakeWorkflow};
    use crate::registry::AgentConfig;
    use crate::store::{DocumentStore, MemoryStore};
    use serde_json::Value;

    const PARENT: &str = "projects/p/locations/us-central1/workflows/research";

    async fn dispatch(
        store: Arc<dyn DocumentStore>,
        client: Arc<FakeWorkflow>,
    ) -> Result<Dispatched, StoreError> {
        let strategy = WorkflowStrategy::new(ExecutionLedger::new(store, "executions"), client);
        let req = request(3, "researcher");
        let agent = AgentConfig::new(true, PARENT, Default::default());
        strategy
            .dispatch(
                DispatchRequest {
                    request: &req,
                    request_id: "req-wf",
                    agent: &agent,
                },
                PARENT,
            )
            .await
    }

    #[tokio::test]
    async fn test_accepted_execution_takes_service_state() {
        let store = MemoryStore::new();
        let client = Arc::new(FakeWorkflow::accepting(None));
        let dispatched = dispatch(Arc::new(store.clone()), client.clone())
            .await
            .unwrap();
        assert!(dispatched.execution_id.starts_with("exec_"));
        let id = dispatched.execution_id.clone();
        dispatched.completion.unwrap().await.unwrap();

        let doc = store.get("executions", &id).await.unwrap().unwrap();
        assert_eq!(doc["status"], "ACTIVE");
        assert_eq!(doc["workflow_stub"], PARENT);
        let name = doc["workflow_execution_name"].as_str().unwrap();
        assert!(name.starts_with(&format!("{PARENT}/executions/")));
        assert!(!doc.contains_key("completed_at"));

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PARENT);
        let argument: Value = serde_json::from_str(&calls[0].1).unwrap();
        assert_eq!(argument, request(3, "researcher").payload);
    }

    #[tokio::test]
    async fn test_reported_state_is_recorded_verbatim() {
        let store = MemoryStore::new();
        let client = Arc::new(FakeWorkflow::accepting(Some("SUCCEEDED")));
        let dispatched = dispatch(Arc::new(store.clone()), client).await.unwrap();
        let id = dispatched.execution_id.clone();
        dispatched.completion.unwrap().await.unwrap();

        let doc = store.get("executions", &id).await.unwrap().unwrap();
        assert_eq!(doc["status"], "SUCCEEDED");
    }

    #[tokio::test]
    async fn test_rejection_records_workflow_error() {
        let store = MemoryStore::new();
        let client = Arc::new(FakeWorkflow::rejecting("permission denied"));
        let dispatched = dispatch(Arc::new(store.clone()), client).await.unwrap();
        let id = dispatched.execution_id.clone();
        dispatched.completion.unwrap().await.unwrap();

        let doc = store.get("executions", &id).await.unwrap().unwrap();
        assert_eq!(doc["status"], "workflow_error");
        assert_eq!(doc["error_details"], "permission denied");
        assert_eq!(doc["workflow_execution_name"], Value::Null);
        assert!(doc.contains_key("completed_at"));
    }

    #[tokio::test]
    async fn test_initial_write_failure_skips_submission() {
        let client = Arc::new(FakeWorkflow::accepting(None));
        let result = dispatch(Arc::new(FailingStore::failing_sets()), client.clone()).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert!(client.calls().is_empty());
    }
}

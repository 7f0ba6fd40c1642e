//! Persisted execution record and its partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::status::{ExecutionStatus, WORKFLOW_DEFAULT_STATE};
use crate::dispatch::RouteRequest;
use crate::error::DispatchError;
use crate::store::Document;

/// One dispatched route request, keyed by `execution_id` in the executions
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub project_slot: u8,
    pub agent_id: String,
    pub mode: String,
    pub request_id: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub progress: f64,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_stub: Option<String>,

    /// `Some(None)` is written as an explicit `null` until the workflow
    /// service assigns a handle.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub workflow_execution_name: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

impl ExecutionRecord {
    /// Fresh `queued` record for a validated request.
    pub fn queued(execution_id: &str, request: &RouteRequest, request_id: &str) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            project_slot: request.project_slot,
            agent_id: request.agent_id.clone(),
            mode: request.mode.clone(),
            request_id: request_id.to_string(),
            status: ExecutionStatus::Queued,
            progress: 0.0,
            created_at: Utc::now(),
            workflow_stub: None,
            workflow_execution_name: None,
            completed_at: None,
            result: None,
            error: None,
            error_details: None,
        }
    }

    pub fn with_workflow_stub(mut self, workflow_stub: &str) -> Self {
        self.workflow_stub = Some(workflow_stub.to_string());
        self
    }

    /// Marks the record as awaiting a workflow-service handle.
    pub fn awaiting_workflow(mut self) -> Self {
        self.workflow_execution_name = Some(None);
        self
    }

    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        into_document(serde_json::to_value(self)?)
    }

    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }
}

/// Partial update merged into an existing record. Only populated fields are
/// written; `progress` keeps the value set at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_execution_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExecutionUpdate {
    pub fn complete(result: Value) -> Self {
        Self {
            status: Some(ExecutionStatus::Complete),
            result: Some(result),
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Terminal failure. Workflow submission failures land in
    /// `error_details`, every other failure in `error`.
    pub fn failed(err: &DispatchError) -> Self {
        let message = err.to_string();
        let mut update = Self {
            status: Some(err.status()),
            completed_at: Some(Utc::now()),
            ..Self::default()
        };
        match err {
            DispatchError::WorkflowSubmission(_) => update.error_details = Some(message),
            _ => update.error = Some(message),
        }
        update
    }

    /// Workflow service accepted the execution.
    pub fn workflow_started(name: &str, state: Option<&str>) -> Self {
        let state = state
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(WORKFLOW_DEFAULT_STATE);
        Self {
            status: Some(ExecutionStatus::from(state)),
            workflow_execution_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn to_fields(&self) -> Result<Document, serde_json::Error> {
        into_document(serde_json::to_value(self)?)
    }
}

fn into_document(value: Value) -> Result<Document, serde_json::Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(serde::de::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RouteRequest {
        RouteRequest {
            project_slot: 2,
            agent_id: "oracle-agent".into(),
            mode: "async".into(),
            payload: json!({"task": "verify"}),
        }
    }

    #[test]
    fn test_queued_record_document_shape() {
        let doc = ExecutionRecord::queued("stub_1", &request(), "req-1")
            .to_document()
            .unwrap();
        assert_eq!(doc["status"], "queued");
        assert_eq!(doc["progress"].as_f64(), Some(0.0));
        assert_eq!(doc["project_slot"], 2);
        assert_eq!(doc["request_id"], "req-1");
        assert!(doc.contains_key("created_at"));
        assert!(!doc.contains_key("workflow_stub"));
        assert!(!doc.contains_key("workflow_execution_name"));
        assert!(!doc.contains_key("result"));
    }

    #[test]
    fn test_awaiting_workflow_writes_explicit_null() {
        let record = ExecutionRecord::queued("exec_1", &request(), "req-1").awaiting_workflow();
        let doc = record.to_document().unwrap();
        assert_eq!(doc.get("workflow_execution_name"), Some(&Value::Null));

        let back = ExecutionRecord::from_document(doc).unwrap();
        assert_eq!(back.workflow_execution_name, Some(None));
    }

    #[test]
    fn test_complete_update_fields() {
        let fields = ExecutionUpdate::complete(json!({"answer": 42}))
            .to_fields()
            .unwrap();
        assert_eq!(fields["status"], "complete");
        assert_eq!(fields["result"]["answer"], 42);
        assert!(fields.contains_key("completed_at"));
        assert!(!fields.contains_key("error"));
        assert!(!fields.contains_key("progress"));
    }

    #[test]
    fn test_failed_update_routes_message() {
        let http = ExecutionUpdate::failed(&DispatchError::HttpBackend("refused".into()))
            .to_fields()
            .unwrap();
        assert_eq!(http["status"], "oracle_error");
        assert_eq!(http["error"], "refused");

        let wf = ExecutionUpdate::failed(&DispatchError::WorkflowSubmission("denied".into()))
            .to_fields()
            .unwrap();
        assert_eq!(wf["status"], "workflow_error");
        assert_eq!(wf["error_details"], "denied");
        assert!(!wf.contains_key("error"));
    }

    #[test]
    fn test_workflow_started_defaults_state() {
        let update = ExecutionUpdate::workflow_started("projects/p/executions/e1", None);
        assert_eq!(update.status, Some(ExecutionStatus::Workflow("ACTIVE".into())));
        let update = ExecutionUpdate::workflow_started("n", Some("SUCCEEDED"));
        assert_eq!(
            update.status,
            Some(ExecutionStatus::Workflow("SUCCEEDED".into()))
        );
    }
}

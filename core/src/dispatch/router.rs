use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::context::Services;
use crate::error::{RouteError, StatusError};
use crate::registry::{DispatchTarget, Registry};
use crate::status::{ExecutionStatusView, StatusQuery};

use super::{
    DispatchRequest, ExecutionLedger, HttpStrategy, InternalStrategy, RouteRequestBody,
    StubStrategy, WorkflowStrategy,
};

/// Accepted route request as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub request_id: String,
    pub execution_id: String,
    pub project_slot: u8,
    pub agent_id: String,
    pub firestore_path: String,
    pub status_url: String,
}

/// Validates a route request against the registry, hands it to the strategy
/// picked by the agent's target and reports where the execution record lives.
///
/// Completion tasks spawned by the strategies are detached here; callers
/// observe them only through [`DispatchRouter::status`].
pub struct DispatchRouter {
    registry: Arc<Registry>,
    ledger: ExecutionLedger,
    stub: StubStrategy,
    http: HttpStrategy,
    internal: InternalStrategy,
    workflow: WorkflowStrategy,
    status: StatusQuery,
}

impl DispatchRouter {
    pub fn new(registry: Arc<Registry>, services: Services, collection: &str) -> Self {
        let ledger = ExecutionLedger::new(services.store, collection);
        Self {
            stub: StubStrategy::new(ledger.clone()),
            http: HttpStrategy::new(ledger.clone(), services.http_backend),
            internal: InternalStrategy::new(ledger.clone(), Arc::clone(&registry)),
            workflow: WorkflowStrategy::new(ledger.clone(), services.workflow),
            status: StatusQuery::new(ledger.clone()),
            registry,
            ledger,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn collection(&self) -> &str {
        self.ledger.collection()
    }

    pub async fn route(
        &self,
        body: RouteRequestBody,
        request_id: &str,
    ) -> Result<RouteOutcome, RouteError> {
        let request = body.validate()?;
        let agent = self
            .registry
            .resolve(request.project_slot, &request.agent_id)?;
        let target = agent.target();

        tracing::info!(
            target: "governor.dispatch",
            request_id = %request_id,
            project_slot = request.project_slot,
            agent_id = %request.agent_id,
            strategy = target.strategy_name(),
            "Routing request"
        );

        let req = DispatchRequest {
            request: &request,
            request_id,
            agent,
        };
        let dispatched = match target {
            DispatchTarget::Stub => self.stub.dispatch(req).await?,
            DispatchTarget::Http(url) => self.http.dispatch(req, url).await?,
            DispatchTarget::Internal(command) => self.internal.dispatch(req, command).await?,
            DispatchTarget::Workflow(parent) => self.workflow.dispatch(req, parent).await?,
        };
        let execution_id = dispatched.execution_id;

        Ok(RouteOutcome {
            request_id: request_id.to_string(),
            firestore_path: self.ledger.path(&execution_id),
            status_url: format!("/v1/status/{execution_id}"),
            execution_id,
            project_slot: request.project_slot,
            agent_id: request.agent_id,
        })
    }

    pub async fn status(&self, execution_id: &str) -> Result<ExecutionStatusView, StatusError> {
        self.status.get_status(execution_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{sample_registry, services, FailingStore, FakeBackend};
    use crate::error::ValidationError;
    use crate::execution::{ExecutionStatus, COMMANDER_COLLECTION, COMMANDER_DOC_ID};
    use crate::store::{DocumentStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn body(value: Value) -> RouteRequestBody {
        serde_json::from_value(value).unwrap()
    }

    fn route_body(slot: u8, agent: &str) -> RouteRequestBody {
        body(json!({
            "project_slot": slot,
            "agent_id": agent,
            "mode": "async",
            "payload": {"task": "verify"}
        }))
    }

    fn router(store: MemoryStore, backend: FakeBackend) -> DispatchRouter {
        DispatchRouter::new(
            Arc::new(sample_registry()),
            services(Arc::new(store), backend),
            "executions",
        )
    }

    async fn wait_for_status(router: &DispatchRouter, id: &str, expected: &str) -> ExecutionStatusView {
        for _ in 0..100 {
            let view = router.status(id).await.unwrap();
            if view.status.as_ref().map(ExecutionStatus::as_str) == Some(expected) {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("execution {id} never reached {expected}");
    }

    #[tokio::test]
    async fn test_stub_round_trip() {
        let store = MemoryStore::new();
        let router = router(store.clone(), FakeBackend::ok(json!(null)));

        let outcome = router.route(route_body(1, "stubby"), "req-1").await.unwrap();
        assert!(outcome.execution_id.starts_with("stub_"));
        assert_eq!(outcome.request_id, "req-1");
        assert_eq!(outcome.project_slot, 1);
        assert_eq!(outcome.agent_id, "stubby");
        assert_eq!(
            outcome.firestore_path,
            format!("executions/{}", outcome.execution_id)
        );
        assert_eq!(
            outcome.status_url,
            format!("/v1/status/{}", outcome.execution_id)
        );

        let view = router.status(&outcome.execution_id).await.unwrap();
        assert_eq!(view.status, Some(ExecutionStatus::Queued));
        assert_eq!(view.progress, 0.0);
        assert_eq!(router.status(&outcome.execution_id).await.unwrap(), view);
    }

    #[tokio::test]
    async fn test_validation_order() {
        let router = router(MemoryStore::new(), FakeBackend::ok(json!(null)));
        let cases = [
            (json!({"project_slot": 1, "agent_id": "stubby", "mode": "async"}), ValidationError::MissingFields),
            (json!({"project_slot": 11, "agent_id": "stubby", "mode": "sync", "payload": {}}), ValidationError::InvalidSlot),
            (json!({"project_slot": 7, "agent_id": "stubby", "mode": "sync", "payload": {}}), ValidationError::UnsupportedMode("sync".into())),
            (json!({"project_slot": 7, "agent_id": "stubby", "mode": "async", "payload": {}}), ValidationError::SlotNotFound(7)),
            (json!({"project_slot": 1, "agent_id": "ghost", "mode": "async", "payload": {}}), ValidationError::AgentNotFound { slot: 1, agent_id: "ghost".into() }),
            (json!({"project_slot": 2, "agent_id": "dormant", "mode": "async", "payload": {}}), ValidationError::AgentDisabled("dormant".into())),
        ];
        for (case, expected) in cases {
            match router.route(body(case), "req-v").await {
                Err(RouteError::Validation(err)) => assert_eq!(err, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let store = MemoryStore::new();
        let router = router(store.clone(), FakeBackend::ok(json!(null)));
        assert!(router.route(route_body(2, "dormant"), "req-x").await.is_err());
        assert!(router.route(route_body(4, "anyone"), "req-y").await.is_err());
        assert_eq!(store.count("executions").await, 0);
    }

    #[tokio::test]
    async fn test_reenabled_agent_routes_after_rejection() {
        const REGISTRY: &str =
            r#"{"4": {"night-shift": {"enabled": ENABLED, "workflow_stub": "stub://night"}}}"#;
        let store = MemoryStore::new();
        let build = |enabled: &str| {
            let registry = Registry::from_json(&REGISTRY.replace("ENABLED", enabled)).unwrap();
            DispatchRouter::new(
                Arc::new(registry),
                services(Arc::new(store.clone()), FakeBackend::ok(json!(null))),
                "executions",
            )
        };

        let disabled = build("false");
        match disabled.route(route_body(4, "night-shift"), "req-off").await {
            Err(RouteError::Validation(err)) => {
                assert_eq!(err, ValidationError::AgentDisabled("night-shift".into()));
                assert_eq!(err.status_code(), 403);
            }
            other => panic!("expected AgentDisabled, got {other:?}"),
        }
        assert_eq!(store.count("executions").await, 0);

        let enabled = build("true");
        let outcome = enabled
            .route(route_body(4, "night-shift"), "req-on")
            .await
            .unwrap();
        let view = enabled.status(&outcome.execution_id).await.unwrap();
        assert_eq!(view.status, Some(ExecutionStatus::Queued));
        assert_eq!(store.count("executions").await, 1);
    }

    #[tokio::test]
    async fn test_http_dispatch_eventually_completes() {
        let store = MemoryStore::new();
        let router = router(store.clone(), FakeBackend::ok(json!({"verdict": "ok"})));

        let outcome = router.route(route_body(2, "oracle-agent"), "req-h").await.unwrap();
        assert!(outcome.execution_id.starts_with("http_"));
        wait_for_status(&router, &outcome.execution_id, "complete").await;

        let doc = store
            .get("executions", &outcome.execution_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["result"], json!({"verdict": "ok"}));
    }

    #[tokio::test]
    async fn test_http_backend_failure_still_accepted() {
        let router = router(MemoryStore::new(), FakeBackend::err("503 Service Unavailable"));
        let outcome = router.route(route_body(2, "oracle-agent"), "req-e").await.unwrap();
        wait_for_status(&router, &outcome.execution_id, "oracle_error").await;
    }

    #[tokio::test]
    async fn test_workflow_dispatch_reaches_active() {
        let router = router(MemoryStore::new(), FakeBackend::ok(json!(null)));
        let outcome = router.route(route_body(2, "flow"), "req-w").await.unwrap();
        assert!(outcome.execution_id.starts_with("exec_"));
        wait_for_status(&router, &outcome.execution_id, "ACTIVE").await;
    }

    #[tokio::test]
    async fn test_commander_boot_summary() {
        let store = MemoryStore::new();
        let router = router(store.clone(), FakeBackend::ok(json!(null)));
        let outcome = router.route(route_body(1, "commander"), "req-c").await.unwrap();
        assert!(outcome.execution_id.starts_with("cmd_"));

        let view = router.status(&outcome.execution_id).await.unwrap();
        assert_eq!(view.status, Some(ExecutionStatus::Complete));
        let state = store
            .get(COMMANDER_COLLECTION, COMMANDER_DOC_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            state["registry_summary"],
            json!({"1": ["commander", "stubby"], "2": ["oracle-agent", "flow"]})
        );
    }

    #[tokio::test]
    async fn test_initial_write_failure_is_store_error() {
        let router = DispatchRouter::new(
            Arc::new(sample_registry()),
            services(Arc::new(FailingStore::failing_sets()), FakeBackend::ok(json!(null))),
            "executions",
        );
        let err = router.route(route_body(1, "stubby"), "req-f").await.unwrap_err();
        assert!(matches!(err, RouteError::Store(_)));
    }

    #[tokio::test]
    async fn test_unknown_execution_is_not_found() {
        let router = router(MemoryStore::new(), FakeBackend::ok(json!(null)));
        let err = router.status("stub_missing").await.unwrap_err();
        assert!(matches!(err, StatusError::NotFound(id) if id == "stub_missing"));
    }
}

use crate::error::StoreError;
use crate::execution::{new_execution_id, ExecutionRecord};

use super::{DispatchRequest, Dispatched, ExecutionLedger};

/// No-op backend. The record stays `queued` unless something outside this
/// crate advances it.
pub struct StubStrategy {
    ledger: ExecutionLedger,
}

impl StubStrategy {
    pub fn new(ledger: ExecutionLedger) -> Self {
        Self { ledger }
    }

    pub async fn dispatch(&self, req: DispatchRequest<'_>) -> Result<Dispatched, StoreError> {
        let execution_id = new_execution_id("stub");
        let record = ExecutionRecord::queued(&execution_id, req.request, req.request_id);
        self.ledger.create(&record).await?;

        tracing::info!(
            target: "governor.dispatch",
            request_id = %req.request_id,
            execution_id = %execution_id,
            "Stub execution created"
        );
        Ok(Dispatched::detached(execution_id))
    }
}

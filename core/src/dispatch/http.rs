use std::sync::Arc;
use tracing::Instrument;

use crate::backend::HttpBackend;
use crate::error::{DispatchError, StoreError};
use crate::execution::{new_execution_id, ExecutionRecord, ExecutionUpdate};

use super::{DispatchRequest, Dispatched, ExecutionLedger};

/// Fire-and-forget POST to a remote backend. The caller gets the execution
/// id as soon as the `queued` record exists; the backend result lands on the
/// record from a detached task.
pub struct HttpStrategy {
    ledger: ExecutionLedger,
    backend: Arc<dyn HttpBackend>,
}

impl HttpStrategy {
    pub fn new(ledger: ExecutionLedger, backend: Arc<dyn HttpBackend>) -> Self {
        Self { ledger, backend }
    }

    pub async fn dispatch(
        &self,
        req: DispatchRequest<'_>,
        url: &str,
    ) -> Result<Dispatched, StoreError> {
        let execution_id = new_execution_id("http");
        let record = ExecutionRecord::queued(&execution_id, req.request, req.request_id)
            .with_workflow_stub(url);
        self.ledger.create(&record).await?;
        tracing::info!(
            target: "governor.dispatch",
            request_id = %req.request_id,
            execution_id = %execution_id,
            "HTTP execution queued"
        );

        let ledger = self.ledger.clone();
        let backend = Arc::clone(&self.backend);
        let payload = req.request.payload.clone();
        let url = url.to_string();
        let id = execution_id.clone();
        let span = tracing::info_span!("http_completion", execution_id = %execution_id);

        let completion = tokio::spawn(
            async move {
                let update = match backend.invoke(&url, &payload).await {
                    Ok(body) => {
                        tracing::info!(target: "governor.dispatch", "HTTP execution success");
                        ExecutionUpdate::complete(body)
                    }
                    Err(err) => {
                        tracing::error!(
                            target: "governor.dispatch",
                            error = %err,
                            "HTTP execution failed"
                        );
                        ExecutionUpdate::failed(&DispatchError::HttpBackend(err.to_string()))
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

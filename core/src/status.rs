//! Client-facing projection of an execution record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::ExecutionLedger;
use crate::error::StatusError;
use crate::execution::ExecutionStatus;

/// `status` and `progress` only; results and errors stay in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatusView {
    pub status: Option<ExecutionStatus>,
    pub progress: f64,
}

pub struct StatusQuery {
    ledger: ExecutionLedger,
}

impl StatusQuery {
    pub fn new(ledger: ExecutionLedger) -> Self {
        Self { ledger }
    }

    pub async fn get_status(&self, execution_id: &str) -> Result<ExecutionStatusView, StatusError> {
        let document = self
            .ledger
            .fetch(execution_id)
            .await?
            .ok_or_else(|| StatusError::NotFound(execution_id.to_string()))?;

        let status = match document.get("status") {
            Some(Value::String(s)) => Some(ExecutionStatus::from(s.as_str())),
            _ => None,
        };
        let progress = document
            .get("progress")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Ok(ExecutionStatusView { status, progress })
    }
}

//! Execution lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status stored on an execution record.
///
/// Statuses written by this crate are lowercase snake case. States reported
/// by the workflow service (`ACTIVE`, `SUCCEEDED`, ...) are kept verbatim in
/// [`ExecutionStatus::Workflow`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Queued,
    Complete,
    OracleError,
    InternalError,
    WorkflowError,
    UnknownCommand,
    Workflow(String),
}

/// Default state recorded when the workflow service does not report one.
pub const WORKFLOW_DEFAULT_STATE: &str = "ACTIVE";

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Complete => "complete",
            Self::OracleError => "oracle_error",
            Self::InternalError => "internal_error",
            Self::WorkflowError => "workflow_error",
            Self::UnknownCommand => "unknown_command",
            Self::Workflow(state) => state,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::OracleError | Self::InternalError | Self::WorkflowError | Self::UnknownCommand
        )
    }

    /// No further transition is performed by this crate from a terminal status.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Queued => false,
            Self::Complete => true,
            Self::Workflow(state) => {
                matches!(state.as_str(), "SUCCEEDED" | "FAILED" | "CANCELLED")
            }
            _ => self.is_error(),
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => Self::Queued,
            "complete" => Self::Complete,
            "oracle_error" => Self::OracleError,
            "internal_error" => Self::InternalError,
            "workflow_error" => Self::WorkflowError,
            "unknown_command" => Self::UnknownCommand,
            _ => Self::Workflow(value),
        }
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Workflow(state) => state,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

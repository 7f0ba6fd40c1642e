use thiserror::Error;

use super::store::StoreError;
use crate::execution::ExecutionStatus;

/// Client-caused rejection of a route request. Never persisted, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: project_slot, agent_id, mode, payload")]
    MissingFields,

    #[error("project_slot must be an integer between 1 and 9")]
    InvalidSlot,

    #[error("Only async mode is supported")]
    UnsupportedMode(String),

    #[error("Project slot {0} not found")]
    SlotNotFound(u8),

    #[error("Agent '{agent_id}' not found in project slot {slot}")]
    AgentNotFound { slot: u8, agent_id: String },

    #[error("Agent '{0}' is disabled")]
    AgentDisabled(String),
}

impl ValidationError {
    /// HTTP status class the rejection maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingFields | Self::InvalidSlot | Self::UnsupportedMode(_) => 400,
            Self::SlotNotFound(_) | Self::AgentNotFound { .. } => 404,
            Self::AgentDisabled(_) => 403,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidSlot => "INVALID_SLOT",
            Self::UnsupportedMode(_) => "UNSUPPORTED_MODE",
            Self::SlotNotFound(_) => "SLOT_NOT_FOUND",
            Self::AgentNotFound { .. } => "AGENT_NOT_FOUND",
            Self::AgentDisabled(_) => "AGENT_DISABLED",
        }
    }
}

/// Failure of the route operation as seen by the caller.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The initial execution record could not be written.
    #[error("failed to create execution record: {0}")]
    Store(#[from] StoreError),
}

/// Failure of a status lookup.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Execution not found")]
    NotFound(String),

    #[error("failed to read execution: {0}")]
    Store(#[from] StoreError),
}

/// Backend failure after the execution record exists. Only ever surfaced
/// through the record's status and error fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    HttpBackend(String),

    #[error("{0}")]
    WorkflowSubmission(String),

    #[error("{0}")]
    InternalCommand(String),

    #[error("Unknown internal command: {0}")]
    UnknownCommand(String),
}

impl DispatchError {
    /// Terminal status recorded for this failure.
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::HttpBackend(_) => ExecutionStatus::OracleError,
            Self::WorkflowSubmission(_) => ExecutionStatus::WorkflowError,
            Self::InternalCommand(_) => ExecutionStatus::InternalError,
            Self::UnknownCommand(_) => ExecutionStatus::UnknownCommand,
        }
    }
}

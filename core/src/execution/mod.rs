//! Execution records, statuses and the commander singleton.

pub mod commander;
pub mod record;
pub mod status;

pub use commander::{CommanderState, AVAILABLE_COMMANDS, COMMANDER_COLLECTION, COMMANDER_DOC_ID};
pub use record::{ExecutionRecord, ExecutionUpdate};
pub use status::{ExecutionStatus, WORKFLOW_DEFAULT_STATE};

use uuid::Uuid;

/// Globally unique execution id carrying a diagnostic strategy prefix.
pub fn new_execution_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_ids_are_prefixed_and_unique() {
        let a = new_execution_id("http");
        let b = new_execution_id("http");
        assert!(a.starts_with("http_"));
        assert_ne!(a, b);
    }
}

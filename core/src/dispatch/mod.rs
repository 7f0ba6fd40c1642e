//! Dispatch router and the four execution strategies.

mod http;
mod internal;
mod ledger;
mod request;
mod router;
mod stub;
mod workflow;

pub use http::HttpStrategy;
pub use internal::InternalStrategy;
pub use ledger::ExecutionLedger;
pub use request::{RouteRequest, RouteRequestBody, ASYNC_MODE};
pub use router::{DispatchRouter, RouteOutcome};
pub use stub::StubStrategy;
pub use workflow::WorkflowStrategy;

use tokio::task::JoinHandle;

use crate::registry::AgentConfig;

/// Inputs shared by every strategy's `dispatch`.
#[derive(Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub request: &'a RouteRequest,
    pub request_id: &'a str,
    pub agent: &'a AgentConfig,
}

/// Result of a strategy dispatch: the execution id, plus the background
/// completion task when the strategy spawned one.
#[derive(Debug)]
pub struct Dispatched {
    pub execution_id: String,
    pub completion: Option<JoinHandle<()>>,
}

impl Dispatched {
    pub fn detached(execution_id: String) -> Self {
        Self {
            execution_id,
            completion: None,
        }
    }
}

pub mod mock;
pub mod service;

pub use mock::MockWorkflowClient;
pub use service::ServiceWorkflowClient;

pub mod api;
pub mod backend;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod registry;
pub mod status;
pub mod store;

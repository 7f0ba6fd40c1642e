//! HTTP服务器模块 - 暴露路由、注册表与执行状态 API

pub mod client;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use models::*;
pub use server::*;
pub use state::*;

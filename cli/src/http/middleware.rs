//! HTTP中间件配置

use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::{Duration, Instant};
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::http::{models::HttpServerError, state::AppState};

/// Per-request correlation id, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 超时中间件
pub fn create_timeout_layer(timeout_ms: u64) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_millis(timeout_ms))
}

/// 为每个请求分配 request_id
pub async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    req.extensions_mut()
        .insert(RequestId(Uuid::new_v4().to_string()));
    next.run(req).await
}

/// 共享密钥校验，OPTIONS 预检请求直接放行
pub async fn require_governor_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let auth = &state.config.auth;
    let presented = req
        .headers()
        .get(auth.header.as_str())
        .and_then(|v| v.to_str().ok());
    if auth.authorize(presented) {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    warn!(
        target: "governor.http",
        request_id = %request_id,
        uri = %req.uri(),
        "Unauthorized access attempt"
    );
    HttpServerError::Unauthorized { request_id }.into_response()
}

/// 请求日志中间件
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            target: "governor.http",
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            target: "governor.http",
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

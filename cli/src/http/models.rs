//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use governor_core::api::{ExecutionStatusView, RouteOutcome, SlotAgents, ValidationError};
use indexmap::IndexMap;
use serde::Serialize;

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

// ============= Route =============

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: RouteOutcome,
}

// ============= Registry =============

#[derive(Debug, Serialize)]
pub struct RegistryResponse {
    pub ok: bool,
    pub request_id: String,
    pub registry: IndexMap<u8, SlotAgents>,
}

// ============= Status =============

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub request_id: String,
    pub execution_id: String,
    #[serde(flatten)]
    pub view: ExecutionStatusView,
}

// ============= Error Handling =============

/// Every variant carries the request id echoed in the error body.
#[derive(Debug)]
pub enum HttpServerError {
    Unauthorized { request_id: String },
    InvalidRequest { request_id: String, message: String },
    Validation { request_id: String, error: ValidationError },
    NotFound { request_id: String, message: String },
    Internal { request_id: String, message: String },
}

impl HttpServerError {
    pub fn request_id(&self) -> &str {
        match self {
            Self::Unauthorized { request_id }
            | Self::InvalidRequest { request_id, .. }
            | Self::Validation { request_id, .. }
            | Self::NotFound { request_id, .. }
            | Self::Internal { request_id, .. } => request_id,
        }
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let request_id = self.request_id().to_string();
        let (status, error_code, message) = match self {
            Self::Unauthorized { .. } => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            Self::InvalidRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
            }
            Self::Validation { error, .. } => (
                StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_REQUEST),
                error.code(),
                error.to_string(),
            ),
            Self::NotFound { message, .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            Self::Internal { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("Internal Server Error: {message}"),
            ),
        };

        let body = serde_json::json!({
            "ok": false,
            "error": message,
            "error_code": error_code,
            "request_id": request_id,
        });

        (status, Json(body)).into_response()
    }
}

//! HTTP路由handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use governor_core::api::{RouteError, RouteRequestBody, StatusError};
use serde_json::Value;

use crate::http::{
    middleware::{assign_request_id, require_governor_key, request_logger, RequestId},
    models::*,
    state::AppState,
};

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-GOVERNOR-KEY";

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/route", axum::routing::post(route_handler).options(route_preflight))
        .route("/v1/registry", get(registry_handler))
        .route("/v1/status/:execution_id", get(status_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_governor_key,
        ));

    Router::new()
        .route("/healthz", get(health_handler))
        .merge(protected)
        .layer(middleware::from_fn(request_logger))
        .layer(middleware::from_fn(assign_request_id))
        .with_state(state)
}

/// GET /healthz
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// OPTIONS /v1/route - CORS 预检
async fn route_preflight(State(state): State<AppState>) -> Response {
    let origin = HeaderValue::from_str(&state.config.cors.allow_origin)
        .unwrap_or_else(|_| HeaderValue::from_static("null"));
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ),
        ],
    )
        .into_response()
}

/// POST /v1/route - 校验并分发
async fn route_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<RouteResponse>, HttpServerError> {
    let request_id = request_id.0;
    tracing::info!(target: "governor.http", request_id = %request_id, "Incoming route request");

    let body = parse_route_body(&body).map_err(|message| HttpServerError::InvalidRequest {
        request_id: request_id.clone(),
        message,
    })?;

    match state.router.route(body, &request_id).await {
        Ok(outcome) => Ok(Json(RouteResponse { ok: true, outcome })),
        Err(RouteError::Validation(error)) => {
            tracing::warn!(
                target: "governor.http",
                request_id = %request_id,
                code = error.code(),
                "{}",
                error
            );
            Err(HttpServerError::Validation { request_id, error })
        }
        Err(err @ RouteError::Store(_)) => {
            tracing::error!(
                target: "governor.http",
                request_id = %request_id,
                error = %err,
                "Failed to dispatch request"
            );
            Err(HttpServerError::Internal {
                request_id,
                message: err.to_string(),
            })
        }
    }
}

/// An empty body is treated as `{}`; anything else must be a JSON object.
fn parse_route_body(raw: &[u8]) -> Result<RouteRequestBody, String> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(RouteRequestBody::default());
    }
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| format!("Invalid JSON body: {e}"))?;
    if !value.is_object() {
        return Err("Request body must be a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("Invalid request body: {e}"))
}

/// GET /v1/registry - 已启用的 agents
async fn registry_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<RegistryResponse> {
    tracing::info!(target: "governor.http", request_id = %request_id.as_str(), "Registry request");
    Json(RegistryResponse {
        ok: true,
        request_id: request_id.0,
        registry: state.router.registry().enabled_view(),
    })
}

/// GET /v1/status/:execution_id
async fn status_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(execution_id): Path<String>,
) -> Result<Json<StatusResponse>, HttpServerError> {
    let request_id = request_id.0;
    tracing::info!(
        target: "governor.http",
        request_id = %request_id,
        execution_id = %execution_id,
        "Status check"
    );

    match state.router.status(&execution_id).await {
        Ok(view) => Ok(Json(StatusResponse {
            ok: true,
            request_id,
            execution_id,
            view,
        })),
        Err(err @ StatusError::NotFound(_)) => Err(HttpServerError::NotFound {
            request_id,
            message: err.to_string(),
        }),
        Err(err @ StatusError::Store(_)) => {
            tracing::error!(
                target: "governor.http",
                request_id = %request_id,
                error = %err,
                "Failed to get status"
            );
            Err(HttpServerError::Internal {
                request_id,
                message: err.to_string(),
            })
        }
    }
}

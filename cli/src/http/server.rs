//! HTTP服务器生命周期管理

use super::{middleware::create_timeout_layer, routes::create_router, AppState};
use crate::commands::cli::ServeArgs;
use governor_core::api::{AppContext, CliError, DispatchRouter};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

/// 处理 serve 命令：构建 services 与 router 后启动服务器
pub async fn handle_serve(args: &ServeArgs, ctx: &AppContext) -> Result<(), CliError> {
    let cfg = ctx.cfg();
    let host = args.host.clone().unwrap_or_else(|| cfg.server.host.clone());
    let port = args.port.unwrap_or(cfg.server.port);

    let services = ctx.build_services().await?;
    let router = DispatchRouter::new(ctx.registry(), services, &cfg.store.collection);
    let state = AppState::new(router, cfg.clone());

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| CliError::Config(format!("invalid listen address {host}:{port}: {e}")))?;

    start_server(addr, state).await
}

/// 启动HTTP服务器，Ctrl+C / SIGTERM 时优雅关闭
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<(), CliError> {
    let timeout_ms = state.config.server.request_timeout_ms;
    let app = create_router(state).layer(create_timeout_layer(timeout_ms));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::Server(format!("failed to bind {addr}: {e}")))?;
    info!(target: "governor.http", "Dispatch governor listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }
            info!("Starting graceful shutdown...");
        })
        .await
        .map_err(|e| CliError::Server(e.to_string()))?;

    info!("Server shutdown complete");
    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Windows 系统不支持 SIGTERM
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}

//! Client commands against a running governor server
use crate::commands::cli::{RemoteArgs, RouteArgs, StatusArgs};
use crate::http::client::{GovernorClient, StatusResponse};
use governor_core::api as core_api;
use std::time::Duration;

fn client(remote: &RemoteArgs, cfg: &core_api::AppConfig) -> Result<GovernorClient, core_api::CliError> {
    let key = remote
        .key
        .clone()
        .unwrap_or_else(|| cfg.auth.governor_key.clone());
    GovernorClient::new(&remote.server, key).map_err(core_api::CliError::Anyhow)
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), core_api::CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| core_api::CliError::Command(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Handle route command
pub async fn handle_route(
    args: RouteArgs,
    cfg: &core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    let payload: serde_json::Value = serde_json::from_str(&args.payload)
        .map_err(|e| core_api::CliError::Command(format!("--payload is not valid JSON: {e}")))?;
    let client = client(&args.remote, cfg)?;

    let accepted = client
        .route(args.slot, &args.agent, payload)
        .await
        .map_err(|e| core_api::CliError::Command(format!("Route failed: {e}")))?;
    print_json(&accepted)?;

    if !args.wait {
        return Ok(0);
    }

    let interval = Duration::from_millis(args.poll_interval_ms);
    let mut last: Option<StatusResponse> = None;
    for attempt in 1..=args.max_polls {
        tokio::time::sleep(interval).await;
        let status = client
            .status(&accepted.execution_id)
            .await
            .map_err(|e| core_api::CliError::Command(format!("Status failed: {e}")))?;
        tracing::info!(
            target: "governor.client",
            attempt,
            execution_id = %accepted.execution_id,
            status = ?status.status,
            "polled status"
        );
        let settled = status.status.as_ref().is_some_and(|s| s.is_terminal());
        last = Some(status);
        if settled {
            break;
        }
    }

    match last {
        Some(status) => {
            print_json(&status)?;
            Ok(exit_code_for_status(&status))
        }
        None => Ok(0),
    }
}

/// 0 when complete or still running, 1 when the execution recorded an error.
fn exit_code_for_status(status: &StatusResponse) -> i32 {
    match &status.status {
        Some(s) if s.is_error() => 1,
        Some(core_api::ExecutionStatus::Workflow(state)) if state == "FAILED" || state == "CANCELLED" => 1,
        _ => 0,
    }
}

/// Handle status command
pub async fn handle_status(
    args: StatusArgs,
    cfg: &core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    let client = client(&args.remote, cfg)?;
    let status = client
        .status(&args.execution_id)
        .await
        .map_err(|e| core_api::CliError::Command(format!("Status failed: {e}")))?;
    print_json(&status)?;
    Ok(0)
}

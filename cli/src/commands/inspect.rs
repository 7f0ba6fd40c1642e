//! Offline reads of the configured document store: one full execution record
//! or the commander singleton. No server is involved.
use crate::commands::cli::InspectArgs;
use crate::commands::remote::print_json;
use governor_core::api::{
    AppConfig, CliError, CommanderState, DocumentStore, ExecutionLedger, ExecutionRecord,
    StoreProvider, COMMANDER_COLLECTION, COMMANDER_DOC_ID,
};
use std::sync::Arc;

fn open_store(cfg: &AppConfig) -> Arc<dyn DocumentStore> {
    if matches!(cfg.store.provider, StoreProvider::Memory) {
        tracing::warn!(
            target: "governor.inspect",
            "store provider is memory; documents written by a server process are not visible here"
        );
    }
    governor_plugins::factory::build_store(cfg)
}

/// Full record for `execution_id`, or `None` when it was never written.
pub async fn fetch_execution(
    store: Arc<dyn DocumentStore>,
    collection: &str,
    execution_id: &str,
) -> Result<Option<ExecutionRecord>, CliError> {
    let ledger = ExecutionLedger::new(store, collection);
    let Some(document) = ledger.fetch(execution_id).await? else {
        return Ok(None);
    };
    let record = ExecutionRecord::from_document(document).map_err(|e| {
        CliError::Command(format!(
            "{} is not an execution record: {e}",
            ledger.path(execution_id)
        ))
    })?;
    Ok(Some(record))
}

/// Last commander boot snapshot, if any.
pub async fn fetch_commander(store: &dyn DocumentStore) -> Result<Option<CommanderState>, CliError> {
    let Some(document) = store.get(COMMANDER_COLLECTION, COMMANDER_DOC_ID).await? else {
        return Ok(None);
    };
    let state = serde_json::from_value(serde_json::Value::Object(document)).map_err(|e| {
        CliError::Command(format!(
            "{COMMANDER_COLLECTION}/{COMMANDER_DOC_ID} is not a commander snapshot: {e}"
        ))
    })?;
    Ok(Some(state))
}

/// Handle inspect command
pub async fn handle_inspect(args: InspectArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let store = open_store(cfg);
    match fetch_execution(store, &cfg.store.collection, &args.execution_id).await? {
        Some(record) => {
            print_json(&record)?;
            Ok(0)
        }
        None => {
            eprintln!(
                "Execution not found: {}/{}",
                cfg.store.collection, args.execution_id
            );
            Ok(1)
        }
    }
}

/// Handle commander command
pub async fn handle_commander(cfg: &AppConfig) -> Result<i32, CliError> {
    let store = open_store(cfg);
    match fetch_commander(store.as_ref()).await? {
        Some(state) => {
            print_json(&state)?;
            Ok(0)
        }
        None => {
            eprintln!("Commander has not booted: {COMMANDER_COLLECTION}/{COMMANDER_DOC_ID} is empty");
            Ok(1)
        }
    }
}

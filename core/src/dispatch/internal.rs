use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{DispatchError, StoreError};
use crate::execution::{
    new_execution_id, CommanderState, ExecutionRecord, ExecutionUpdate, COMMANDER_COLLECTION,
    COMMANDER_DOC_ID,
};
use crate::registry::{InternalCommand, Registry};

use super::{DispatchRequest, Dispatched, ExecutionLedger};

const BOOT_MESSAGE: &str = "Commander Booted Successfully";

/// Backend-less system commands named by `internal://<command>`.
pub struct InternalStrategy {
    ledger: ExecutionLedger,
    registry: Arc<Registry>,
}

#[derive(Serialize)]
struct CommanderBootResult<'a> {
    registry: &'a IndexMap<u8, Vec<String>>,
    commands: &'a [String],
    message: &'static str,
}

impl InternalStrategy {
    pub fn new(ledger: ExecutionLedger, registry: Arc<Registry>) -> Self {
        Self { ledger, registry }
    }

    pub async fn dispatch(
        &self,
        req: DispatchRequest<'_>,
        command: &InternalCommand,
    ) -> Result<Dispatched, StoreError> {
        let execution_id = new_execution_id("cmd");
        let record = ExecutionRecord::queued(&execution_id, req.request, req.request_id)
            .with_workflow_stub(&req.agent.workflow_stub);
        self.ledger.create(&record).await?;

        let outcome = match command {
            InternalCommand::CommanderBoot => self
                .commander_boot(&execution_id)
                .await
                .map(|_| ())
                .map_err(|err| DispatchError::InternalCommand(err.to_string())),
            InternalCommand::Unknown(name) => Err(DispatchError::UnknownCommand(name.clone())),
        };

        if let Err(err) = outcome {
            tracing::error!(
                target: "governor.dispatch",
                request_id = %req.request_id,
                execution_id = %execution_id,
                command = %command.name(),
                error = %err,
                "Internal command failed"
            );
            self.ledger
                .settle(&execution_id, &ExecutionUpdate::failed(&err))
                .await;
        }

        Ok(Dispatched::detached(execution_id))
    }

    /// Snapshots enabled agents into the commander singleton, then completes
    /// the execution with the same snapshot.
    async fn commander_boot(&self, execution_id: &str) -> Result<CommanderState, StoreError> {
        let state = CommanderState::online(self.registry.enabled_summary());
        let document = match serde_json::to_value(&state)? {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(StoreError::NotAnObject {
                    collection: COMMANDER_COLLECTION.to_string(),
                    id: COMMANDER_DOC_ID.to_string(),
                })
            }
        };
        self.ledger
            .store()
            .set(COMMANDER_COLLECTION, COMMANDER_DOC_ID, document)
            .await?;
        tracing::info!(
            target: "governor.dispatch",
            slots = state.registry_summary.len(),
            "Commander state updated: {}/{}",
            COMMANDER_COLLECTION,
            COMMANDER_DOC_ID
        );

        let result = serde_json::to_value(CommanderBootResult {
            registry: &state.registry_summary,
            commands: &state.available_commands,
            message: BOOT_MESSAGE,
        })?;
        self.ledger
            .advance(execution_id, &ExecutionUpdate::complete(result))
            .await?;
        Ok(state)
    }
}

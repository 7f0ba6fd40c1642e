use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const COMMANDER_COLLECTION: &str = "commander_state";
pub const COMMANDER_DOC_ID: &str = "current";

/// Commands advertised by a booted commander, in display order.
pub const AVAILABLE_COMMANDS: [&str; 4] = ["boot", "status", "list_agents", "dispatch"];

/// Singleton snapshot written in full on every commander boot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommanderState {
    pub updated_at: DateTime<Utc>,
    pub boot_time: DateTime<Utc>,
    pub registry_summary: IndexMap<u8, Vec<String>>,
    pub available_commands: Vec<String>,
    pub status: String,
}

impl CommanderState {
    pub fn online(registry_summary: IndexMap<u8, Vec<String>>) -> Self {
        let now = Utc::now();
        Self {
            updated_at: now,
            boot_time: now,
            registry_summary,
            available_commands: AVAILABLE_COMMANDS.iter().map(|c| c.to_string()).collect(),
            status: "online".to_string(),
        }
    }
}

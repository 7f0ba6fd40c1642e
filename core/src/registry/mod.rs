//! Static slot → agent registry, loaded once at startup.

mod agent;

pub use agent::{AgentConfig, DispatchTarget, InternalCommand};

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ValidationError;

pub const MIN_SLOT: u8 = 1;
pub const MAX_SLOT: u8 = 9;

/// Agents of one slot, in registry order.
pub type SlotAgents = IndexMap<String, AgentConfig>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid slot key {0:?} (expected a single digit 1 to 9)")]
    InvalidSlot(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    slots: IndexMap<u8, SlotAgents>,
}

impl Registry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let parsed: IndexMap<String, SlotAgents> = serde_json::from_str(raw)?;
        let mut slots = IndexMap::with_capacity(parsed.len());
        for (key, agents) in parsed {
            // One spelling per slot, so "01" or " 1" cannot shadow "1".
            let slot = key
                .parse::<u8>()
                .ok()
                .filter(|s| (MIN_SLOT..=MAX_SLOT).contains(s) && s.to_string() == key)
                .ok_or_else(|| RegistryError::InvalidSlot(key.clone()))?;
            slots.insert(slot, agents);
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, slot: u8) -> Option<&SlotAgents> {
        self.slots.get(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = (u8, &SlotAgents)> {
        self.slots.iter().map(|(slot, agents)| (*slot, agents))
    }

    /// Slot exists → agent exists → agent enabled, first failure wins.
    pub fn resolve(&self, slot: u8, agent_id: &str) -> Result<&AgentConfig, ValidationError> {
        let agents = self
            .slots
            .get(&slot)
            .ok_or(ValidationError::SlotNotFound(slot))?;
        let agent = agents
            .get(agent_id)
            .ok_or_else(|| ValidationError::AgentNotFound {
                slot,
                agent_id: agent_id.to_string(),
            })?;
        if !agent.enabled {
            return Err(ValidationError::AgentDisabled(agent_id.to_string()));
        }
        Ok(agent)
    }

    /// Every slot with only its enabled agents. Slots without enabled agents
    /// are kept as empty maps.
    pub fn enabled_view(&self) -> IndexMap<u8, SlotAgents> {
        self.slots
            .iter()
            .map(|(slot, agents)| {
                let enabled = agents
                    .iter()
                    .filter(|(_, agent)| agent.enabled)
                    .map(|(id, agent)| (id.clone(), agent.clone()))
                    .collect();
                (*slot, enabled)
            })
            .collect()
    }

    /// Enabled agent ids per slot, omitting slots with none enabled.
    pub fn enabled_summary(&self) -> IndexMap<u8, Vec<String>> {
        let mut summary: IndexMap<u8, Vec<String>> = IndexMap::new();
        for (slot, agents) in &self.slots {
            for (id, agent) in agents {
                if agent.enabled {
                    summary.entry(*slot).or_default().push(id.clone());
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "2": {
            "zeta-agent": {"enabled": true, "workflow_stub": "stub://zeta"},
            "oracle-agent": {"enabled": true, "workflow_stub": "https://oracle.example.com/exec"},
            "sleeper": {"enabled": false, "workflow_stub": "stub://sleep"}
        },
        "1": {
            "commander": {"enabled": true, "workflow_stub": "internal://commander_boot"}
        },
        "5": {
            "retired": {"enabled": false, "workflow_stub": "stub://old"}
        }
    }"#;

    #[test]
    fn test_from_json_preserves_order() {
        let registry = Registry::from_json(SAMPLE).unwrap();
        let slots: Vec<u8> = registry.slots().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![2, 1, 5]);
        let agents: Vec<&str> = registry
            .slot(2)
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(agents, vec!["zeta-agent", "oracle-agent", "sleeper"]);
    }

    #[test]
    fn test_rejects_out_of_range_slot() {
        let err = Registry::from_json(r#"{"10": {}}"#).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSlot(k) if k == "10"));
        assert!(Registry::from_json(r#"{"alpha": {}}"#).is_err());
    }

    #[test]
    fn test_rejects_non_canonical_slot_keys() {
        let raw = r#"{"1": {"a": {"workflow_stub": "stub://a"}}, "01": {"b": {"workflow_stub": "stub://b"}}}"#;
        let err = Registry::from_json(raw).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSlot(k) if k == "01"));

        for key in [" 1", "+1", "1 ", "00"] {
            let raw = format!(r#"{{"{key}": {{}}}}"#);
            let err = Registry::from_json(&raw).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidSlot(k) if k == key), "{key:?}");
        }
    }

    #[test]
    fn test_rejects_agent_without_stub() {
        let err = Registry::from_json(r#"{"1": {"a": {"enabled": true}}}"#).unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn test_resolve_order() {
        let registry = Registry::from_json(SAMPLE).unwrap();
        assert_eq!(
            registry.resolve(3, "anything").unwrap_err(),
            ValidationError::SlotNotFound(3)
        );
        assert_eq!(
            registry.resolve(2, "ghost").unwrap_err(),
            ValidationError::AgentNotFound {
                slot: 2,
                agent_id: "ghost".into()
            }
        );
        assert_eq!(
            registry.resolve(2, "sleeper").unwrap_err(),
            ValidationError::AgentDisabled("sleeper".into())
        );
        let agent = registry.resolve(2, "oracle-agent").unwrap();
        assert!(matches!(agent.target(), DispatchTarget::Http(_)));
    }

    #[test]
    fn test_enabled_view_keeps_empty_slots() {
        let registry = Registry::from_json(SAMPLE).unwrap();
        let view = registry.enabled_view();
        assert_eq!(view.len(), 3);
        assert!(view[&5].is_empty());
        assert!(!view[&2].contains_key("sleeper"));
        assert_eq!(view[&2].len(), 2);
    }

    #[test]
    fn test_enabled_summary_omits_empty_slots() {
        let registry = Registry::from_json(SAMPLE).unwrap();
        let summary = registry.enabled_summary();
        let expected: IndexMap<u8, Vec<String>> = [
            (2, vec!["zeta-agent".to_string(), "oracle-agent".to_string()]),
            (1, vec!["commander".to_string()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let registry = Registry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_example_registry_parses() {
        let registry = Registry::from_json(include_str!("../../../registry.example.json")).unwrap();
        assert_eq!(
            registry.resolve(1, "commander").unwrap().target(),
            &DispatchTarget::Internal(InternalCommand::CommanderBoot)
        );
        assert_eq!(
            registry.resolve(2, "research-flow").unwrap_err(),
            ValidationError::AgentDisabled("research-flow".into())
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Registry::load(Path::new("/nonexistent/registry.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Read { .. }));
    }
}

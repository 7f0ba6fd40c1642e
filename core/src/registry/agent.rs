use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const STUB_SCHEME: &str = "stub://";
const INTERNAL_SCHEME: &str = "internal://";

/// System command named by the suffix of an `internal://` stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalCommand {
    CommanderBoot,
    Unknown(String),
}

impl InternalCommand {
    pub fn parse(name: &str) -> Self {
        match name {
            "commander_boot" => Self::CommanderBoot,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::CommanderBoot => "commander_boot",
            Self::Unknown(name) => name,
        }
    }
}

/// Backend selected by the scheme of an agent's `workflow_stub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget {
    Stub,
    Http(String),
    Internal(InternalCommand),
    /// Bare workflow-service resource path (the fallback).
    Workflow(String),
}

impl DispatchTarget {
    /// Classifies by prefix: `stub://`, then `http(s)://`, then
    /// `internal://`, anything else is a workflow resource path.
    pub fn classify(workflow_stub: &str) -> Self {
        if workflow_stub.starts_with(STUB_SCHEME) {
            Self::Stub
        } else if workflow_stub.starts_with("http://") || workflow_stub.starts_with("https://") {
            Self::Http(workflow_stub.to_string())
        } else if let Some(command) = workflow_stub.strip_prefix(INTERNAL_SCHEME) {
            Self::Internal(InternalCommand::parse(command))
        } else {
            Self::Workflow(workflow_stub.to_string())
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::Http(_) => "http",
            Self::Internal(_) => "internal",
            Self::Workflow(_) => "workflow",
        }
    }

    /// Diagnostic prefix of execution ids created for this target.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::Http(_) => "http",
            Self::Internal(_) => "cmd",
            Self::Workflow(_) => "exec",
        }
    }
}

/// One dispatchable agent. Immutable once the registry is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AgentConfigDoc")]
pub struct AgentConfig {
    pub enabled: bool,
    pub workflow_stub: String,
    /// Opaque metadata, echoed unchanged.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
    #[serde(skip)]
    target: DispatchTarget,
}

#[derive(Deserialize)]
struct AgentConfigDoc {
    #[serde(default)]
    enabled: bool,
    workflow_stub: String,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl From<AgentConfigDoc> for AgentConfig {
    fn from(doc: AgentConfigDoc) -> Self {
        Self::new(doc.enabled, doc.workflow_stub, doc.metadata)
    }
}

impl AgentConfig {
    pub fn new(enabled: bool, workflow_stub: impl Into<String>, metadata: Map<String, Value>) -> Self {
        let workflow_stub = workflow_stub.into();
        let target = DispatchTarget::classify(&workflow_stub);
        Self {
            enabled,
            workflow_stub,
            metadata,
            target,
        }
    }

    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }
}

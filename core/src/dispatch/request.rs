//! Route request parsing and field validation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::registry::{MAX_SLOT, MIN_SLOT};

pub const ASYNC_MODE: &str = "async";

/// Raw route body. A field is `None` only when absent; an explicit JSON
/// `null` is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRequestBody {
    #[serde(default, deserialize_with = "present")]
    pub project_slot: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub agent_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub mode: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub payload: Option<Value>,
}

fn present<'de, D>(de: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(de).map(Some)
}

/// A request that passed field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub project_slot: u8,
    pub agent_id: String,
    pub mode: String,
    pub payload: Value,
}

impl RouteRequestBody {
    /// Missing fields → slot range → mode. Registry checks come later.
    pub fn validate(self) -> Result<RouteRequest, ValidationError> {
        let (Some(slot), Some(agent_id), Some(mode), Some(payload)) =
            (self.project_slot, self.agent_id, self.mode, self.payload)
        else {
            return Err(ValidationError::MissingFields);
        };
        // payload only needs to be present; the others must also be truthy.
        if is_falsy(&slot) || is_falsy(&agent_id) || is_falsy(&mode) {
            return Err(ValidationError::MissingFields);
        }

        let project_slot = parse_slot(&slot).ok_or(ValidationError::InvalidSlot)?;

        let mode = match mode {
            Value::String(m) if m == ASYNC_MODE => m,
            Value::String(m) => return Err(ValidationError::UnsupportedMode(m)),
            other => return Err(ValidationError::UnsupportedMode(other.to_string())),
        };

        let agent_id = match agent_id {
            Value::String(id) => id,
            other => other.to_string(),
        };

        Ok(RouteRequest {
            project_slot,
            agent_id,
            mode,
            payload,
        })
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_slot(value: &Value) -> Option<u8> {
    let Value::Number(n) = value else {
        return None;
    };
    let slot = match n.as_i64() {
        Some(i) => i,
        None => {
            let f = n.as_f64()?;
            if f.fract() != 0.0 || !f.is_finite() {
                return None;
            }
            f as i64
        }
    };
    u8::try_from(slot)
        .ok()
        .filter(|s| (MIN_SLOT..=MAX_SLOT).contains(s))
}

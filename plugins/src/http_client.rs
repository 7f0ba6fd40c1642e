//! reqwest plumbing shared by the agent backend and the workflow client.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const BODY_LIMIT: usize = 512;

/// Failure of an outbound call. Travels inside `anyhow::Error`; recover it
/// with `downcast_ref`.
#[derive(Debug, Error)]
pub enum OutboundError {
    #[error("{service} request to {url} failed: {source}")]
    Transport {
        service: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} answered {status} from {url}: {body}")]
    Status {
        service: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{service} sent an unreadable reply from {url}: {source} (body: {body})")]
    Decode {
        service: &'static str,
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl OutboundError {
    /// HTTP status of a non-2xx reply.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn build_client(timeout_ms: u64) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?)
}

/// Bounded copy of a reply body for error messages.
fn clip(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty>".to_string();
    }
    match body.char_indices().nth(BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Sends `req` and returns the body of a 2xx reply.
pub(crate) async fn send(
    service: &'static str,
    url: &str,
    req: RequestBuilder,
) -> Result<String, OutboundError> {
    let transport = |source| OutboundError::Transport {
        service,
        url: url.to_string(),
        source,
    };
    let resp = req.send().await.map_err(transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(OutboundError::Status {
            service,
            url: url.to_string(),
            status: status.as_u16(),
            body: clip(&body),
        });
    }
    Ok(body)
}

/// Agent replies: JSON when it parses, the raw text as a JSON string
/// otherwise, `null` when empty.
pub(crate) fn lenient_json(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

/// Strict decode of a reply that must match `T`.
pub(crate) fn decode<T: DeserializeOwned>(
    service: &'static str,
    url: &str,
    body: &str,
) -> Result<T, OutboundError> {
    serde_json::from_str(body).map_err(|source| OutboundError::Decode {
        service,
        url: url.to_string(),
        body: clip(body),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clip() {
        assert_eq!(clip("  "), "<empty>");
        assert_eq!(clip(" busy "), "busy");
        let long = "é".repeat(BODY_LIMIT + 10);
        let clipped = clip(&long);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), BODY_LIMIT + 3);
    }

    #[test]
    fn test_lenient_json() {
        assert_eq!(lenient_json(r#"{"a":1}"#.into()), json!({"a": 1}));
        assert_eq!(lenient_json("accepted".into()), json!("accepted"));
        assert_eq!(lenient_json("\n".into()), Value::Null);
    }

    #[test]
    fn test_decode_error_names_service() {
        let err = decode::<Value>("workflow", "https://wf.example.com/v1/x", "<html>")
            .unwrap_err();
        assert!(err.status().is_none());
        let msg = err.to_string();
        assert!(msg.starts_with("workflow sent an unreadable reply"));
        assert!(msg.contains("<html>"));
    }

    #[test]
    fn test_status_error_display() {
        let err = OutboundError::Status {
            service: "agent backend",
            url: "https://oracle.example.com/execute".into(),
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(
            err.to_string(),
            "agent backend answered 502 from https://oracle.example.com/execute: bad gateway"
        );
    }
}

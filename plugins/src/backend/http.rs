use async_trait::async_trait;
use governor_core::api::HttpBackend;
use serde_json::Value;

use crate::http_client::{build_client, lenient_json, send};

const SERVICE: &str = "agent backend";

/// Header carrying the shared secret on outbound backend calls.
pub const GOVERNOR_KEY_HEADER: &str = "X-GOVERNOR-KEY";

/// POSTs route payloads to `http(s)://` agents.
#[derive(Clone)]
pub struct ReqwestHttpBackend {
    http: reqwest::Client,
    governor_key: String,
}

impl ReqwestHttpBackend {
    pub fn new(governor_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_client(timeout_ms)?,
            governor_key,
        })
    }
}

#[async_trait]
impl HttpBackend for ReqwestHttpBackend {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn invoke(&self, url: &str, payload: &Value) -> anyhow::Result<Value> {
        tracing::debug!(
            target: "governor.backend",
            stage = "backend.http.invoke.in",
            url = %url
        );
        let req = self
            .http
            .post(url)
            .header(GOVERNOR_KEY_HEADER, &self.governor_key)
            .json(payload);
        let body = lenient_json(send(SERVICE, url, req).await?);
        tracing::debug!(
            target: "governor.backend",
            stage = "backend.http.invoke.out",
            empty = body.is_null()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::OutboundError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_posts_payload_with_governor_key() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/execute")
            .match_header("x-governor-key", "secret")
            .match_body(Matcher::Json(json!({"task": "verify"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"verdict":"ok"}"#)
            .create_async()
            .await;

        let backend = ReqwestHttpBackend::new("secret".to_string(), 1_000).unwrap();
        let url = format!("{}/execute", server.url());
        let body = backend.invoke(&url, &json!({"task": "verify"})).await.unwrap();
        assert_eq!(body, json!({"verdict": "ok"}));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_text_and_empty_bodies() {
        let mut server = Server::new_async().await;
        let _text = server
            .mock("POST", "/text")
            .with_status(200)
            .with_body("accepted")
            .create_async()
            .await;
        let _empty = server
            .mock("POST", "/empty")
            .with_status(204)
            .create_async()
            .await;

        let backend = ReqwestHttpBackend::new(String::new(), 1_000).unwrap();
        let text = backend
            .invoke(&format!("{}/text", server.url()), &json!({}))
            .await
            .unwrap();
        assert_eq!(text, json!("accepted"));
        let empty = backend
            .invoke(&format!("{}/empty", server.url()), &json!({}))
            .await
            .unwrap();
        assert_eq!(empty, Value::Null);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/execute")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let backend = ReqwestHttpBackend::new("k".to_string(), 1_000).unwrap();
        let err = backend
            .invoke(&format!("{}/execute", server.url()), &json!({}))
            .await
            .unwrap_err();
        let outbound = err.downcast_ref::<OutboundError>().unwrap();
        assert!(matches!(outbound, OutboundError::Status { status: 503, .. }));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_transport_error() {
        let backend = ReqwestHttpBackend::new("k".to_string(), 500).unwrap();
        let err = backend
            .invoke("http://127.0.0.1:1/execute", &json!({}))
            .await
            .unwrap_err();
        let outbound = err.downcast_ref::<OutboundError>().unwrap();
        assert!(matches!(outbound, OutboundError::Transport { .. }));
        assert_eq!(outbound.status(), None);
    }
}

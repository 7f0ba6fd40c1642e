//! 远程客户端 - 通过 HTTP 调用运行中的 governor 服务

use anyhow::{Context, Result};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use governor_core::api::ExecutionStatus;

/// `POST /v1/route` 成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub ok: bool,
    pub request_id: String,
    pub execution_id: String,
    pub project_slot: u8,
    pub agent_id: String,
    pub firestore_path: String,
    pub status_url: String,
}

/// `GET /v1/status/:id` 成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub request_id: String,
    pub execution_id: String,
    pub status: Option<ExecutionStatus>,
    #[serde(default)]
    pub progress: f64,
}

/// 远程客户端
#[derive(Clone)]
pub struct GovernorClient {
    client: Client,
    server_url: Url,
    key: String,
}

impl GovernorClient {
    pub fn new(server_url: &str, key: String) -> Result<Self> {
        let server_url =
            Url::parse(server_url).with_context(|| format!("invalid server url {server_url:?}"))?;
        if server_url.cannot_be_a_base() {
            anyhow::bail!("invalid server url {server_url}: not a base url");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            server_url,
            key,
        })
    }

    /// 追加路径段；每段单独做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.server_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid server url {}", self.server_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn route(&self, slot: u8, agent_id: &str, payload: Value) -> Result<RouteResponse> {
        let url = self.endpoint(&["v1", "route"])?;
        tracing::debug!(target: "governor.client", "Sending route request to {}", url);
        let resp = self
            .client
            .post(url.clone())
            .header("X-GOVERNOR-KEY", &self.key)
            .json(&json!({
                "project_slot": slot,
                "agent_id": agent_id,
                "mode": "async",
                "payload": payload,
            }))
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        decode(resp).await
    }

    pub async fn status(&self, execution_id: &str) -> Result<StatusResponse> {
        let url = self.endpoint(&["v1", "status", execution_id])?;
        let resp = self
            .client
            .get(url.clone())
            .header("X-GOVERNOR-KEY", &self.key)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        decode(resp).await
    }
}

/// 非 2xx 时提取服务端的 `error` 字段
async fn decode<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        let request_id = body
            .get("request_id")
            .and_then(Value::as_str)
            .unwrap_or("-");
        anyhow::bail!("{} {} (request_id={})", status.as_u16(), message, request_id);
    }
    Ok(serde_json::from_value(body)?)
}

//! HTTP plumbing shared by the adapters.
//!
//! [`JsonRpcTransport`] implements [`RawCallTransport`] over `eth_call`.
//! [`read_json`] is the common response reader: it rejects non-success
//! statuses before looking at the body, and refuses HTML pages before
//! attempting to parse.

use std::time::Duration;

use async_trait::async_trait;
use naka_core::constants::USER_AGENT;
use naka_core::error::{AdapterError, StakeError};
use naka_core::traits::RawCallTransport;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::trace;

/// Build an HTTP client with the given per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, AdapterError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AdapterError::SourceError(format!("build http client: {e}")))
}

/// Map a request failure to the adapter error taxonomy.
pub fn request_error(e: reqwest::Error, timeout: Duration) -> AdapterError {
    if e.is_timeout() {
        AdapterError::Timeout(timeout)
    } else if e.is_connect() || e.is_request() {
        AdapterError::SourceUnreachable(e.to_string())
    } else {
        AdapterError::SourceError(e.to_string())
    }
}

/// Parse a JSON body, rejecting HTML pages up front.
pub fn parse_json_body<T: DeserializeOwned>(body: &str) -> Result<T, AdapterError> {
    if body.trim_start().starts_with('<') {
        return Err(AdapterError::SourceError("endpoint returned HTML content".into()));
    }
    serde_json::from_str(body).map_err(|e| AdapterError::SourceError(format!("json parse error: {e}")))
}

/// Read a JSON number, or a string holding one, as `f64`.
///
/// Anything else (null, bool, garbage) is a [`StakeError::MalformedWeight`]
/// so the caller can drop the entry instead of failing the whole response.
pub fn json_f64(value: &Value) -> Result<f64, StakeError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| StakeError::MalformedWeight(value.to_string()))
}

/// Longest body excerpt quoted in a status error.
const BODY_EXCERPT_LEN: usize = 200;

/// Decode a response from its status and body.
///
/// A non-success status is an error whatever the body contains; 5xx means
/// the source is unreachable, anything else is a source error. The body is
/// quoted when it is not an HTML page.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, AdapterError> {
    if !status.is_success() {
        let trimmed = body.trim();
        let msg = if trimmed.is_empty() || trimmed.starts_with('<') {
            format!("endpoint returned status {status}")
        } else {
            let excerpt: String = trimmed.chars().take(BODY_EXCERPT_LEN).collect();
            format!("endpoint returned status {status}: {excerpt}")
        };
        return Err(if status.is_server_error() {
            AdapterError::SourceUnreachable(msg)
        } else {
            AdapterError::SourceError(msg)
        });
    }
    parse_json_body(body)
}

/// Read a response body as JSON, rejecting non-success statuses.
pub async fn read_json<T: DeserializeOwned>(resp: Response, timeout: Duration) -> Result<T, AdapterError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| request_error(e, timeout))?;
    trace!(%status, bytes = body.len(), "response received");
    decode_response(status, &body)
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

fn rpc_result(resp: RpcResponse) -> Result<String, AdapterError> {
    if let Some(err) = resp.error {
        return Err(AdapterError::SourceError(format!(
            "rpc error {}: {}",
            err.code, err.message
        )));
    }
    resp.result
        .ok_or_else(|| AdapterError::SourceError("rpc response has no result".into()))
}

/// JSON-RPC `eth_call` transport against a single endpoint.
pub struct JsonRpcTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl JsonRpcTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AdapterError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: endpoint.to_owned(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RawCallTransport for JsonRpcTransport {
    async fn call(&self, to: &str, data: &str) -> Result<String, AdapterError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
            "id": 1
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        rpc_result(read_json(resp, self.timeout).await?)
    }
}

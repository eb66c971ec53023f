//! JSON-RPC over HTTP wallet provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::WalletError;
use crate::provider::{WalletProvider, USER_REJECTED_CODE};

/// HTTP client forwarding provider requests to a JSON-RPC endpoint.
///
/// Used where the execution environment exposes a node with unlocked
/// accounts instead of an injected browser wallet.
#[derive(Debug)]
pub struct RpcWalletProvider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcWalletProvider {
    /// Create a provider targeting the given endpoint (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WalletError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn envelope(&self, method: &str, params: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        })
    }
}

fn into_result(response: RpcResponse) -> Result<Value, WalletError> {
    if let Some(err) = response.error {
        if err.code == USER_REJECTED_CODE {
            return Err(WalletError::Rejected(err.message));
        }
        return Err(WalletError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    Ok(response.result.unwrap_or(Value::Null))
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let body = self.envelope(method, params);
        tracing::trace!(method, url = %self.url, "provider request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WalletError::Transport(format!(
                "endpoint returned HTTP {}",
                response.status()
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::InvalidResponse(format!("invalid JSON response: {e}")))?;
        into_result(parsed)
    }

    fn name(&self) -> &str {
        "json-rpc"
    }
}

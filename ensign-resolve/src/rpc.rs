//! JSON-RPC client for read-only contract calls.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use ensign_core::error::{EnsignError, Result};
use ensign_core::traits::EthCall;
use ensign_core::types::Chain;

use crate::config::RpcConfig;

/// JSON-RPC 2.0 client over HTTP, one endpoint per chain.
pub struct RpcClient {
    config: RpcConfig,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for the given endpoints.
    pub fn new(config: RpcConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EnsignError::ConfigError(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Sends a single JSON-RPC request and returns its `result`.
    #[instrument(skip(self, params))]
    pub async fn request(
        &self,
        chain: Chain,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = self
            .config
            .endpoint(chain)
            .ok_or(EnsignError::UnsupportedChain(chain.id()))?;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                if e.is_timeout() {
                    EnsignError::ConnectionTimeout(e.to_string())
                } else {
                    EnsignError::HttpError(e.to_string())
                }
            })?;

        let mut json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EnsignError::HttpError(e.to_string()))?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            warn!(%chain, method, error = ?error, "RPC returned an error");
            return Err(classify_rpc_error(error, message));
        }

        match json.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(EnsignError::RpcError(format!("{method}: response has no result"))),
        }
    }
}

/// Reverts are a property of the call, not of the transport, so they are not retried.
fn classify_rpc_error(error: &serde_json::Value, message: String) -> EnsignError {
    let code = error.get("code").and_then(|c| c.as_i64());
    if code == Some(3) || message.contains("revert") || message.contains("out of gas") {
        EnsignError::ContractCallFailed {
            to: String::new(),
            reason: message,
        }
    } else {
        EnsignError::RpcError(message)
    }
}

#[async_trait]
impl EthCall for RpcClient {
    #[instrument(skip(self, calldata))]
    async fn call(&self, to: Address, calldata: Bytes, chain: Chain) -> Result<Bytes> {
        let params = serde_json::json!([
            {
                "to": format!("{to:#x}"),
                "data": format!("0x{}", hex::encode(&calldata)),
            },
            "latest"
        ]);

        let result = self.request(chain, "eth_call", params).await.map_err(|e| match e {
            EnsignError::ContractCallFailed { reason, .. } => EnsignError::ContractCallFailed {
                to: format!("{to:#x}"),
                reason,
            },
            other => other,
        })?;

        let hex_data = result
            .as_str()
            .ok_or_else(|| EnsignError::RpcError("eth_call result is not a string".into()))?;
        let data = hex::decode(hex_data.strip_prefix("0x").unwrap_or(hex_data))?;

        debug!(%to, len = data.len(), "eth_call returned");
        Ok(Bytes::from(data))
    }
}

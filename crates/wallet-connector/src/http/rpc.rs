/*
[INPUT]:  JSON-RPC endpoint URL and method calls
[OUTPUT]: Decoded JSON-RPC results (chain id, block number)
[POS]:    HTTP layer - network provider a signer is bound to
[UPDATE]: When adding RPC helpers or transport options
*/

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::client::{ClientConfig, build_http_client, send_json};
use crate::backend::NetworkProvider;
use crate::error::{ConnectorError, Result};
use crate::types::normalize_chain_id;

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// HTTP JSON-RPC provider. Plain HTTP transports have no event subscriptions.
#[derive(Debug)]
pub struct JsonRpcProvider {
    http_client: Client,
    rpc_url: String,
    url: Url,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(rpc_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), rpc_url)
    }

    pub fn with_config(config: ClientConfig, rpc_url: &str) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(&config)?,
            rpc_url: rpc_url.to_string(),
            url: Url::parse(rpc_url)?,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue a JSON-RPC call and decode its `result`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let builder = self.http_client.post(self.url.clone()).json(&body);
        let response: RpcResponse<T> = send_json(builder).await?;

        if let Some(error) = response.error {
            return Err(ConnectorError::Api {
                code: error.code as i32,
                message: error.message,
            });
        }
        response.result.ok_or_else(|| {
            ConnectorError::api_error(
                StatusCode::BAD_GATEWAY,
                format!("{method} returned neither result nor error"),
            )
        })
    }

    /// eth_chainId
    pub async fn chain_id(&self) -> Result<u64> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        normalize_chain_id(raw)
    }

    /// eth_blockNumber
    pub async fn block_number(&self) -> Result<u64> {
        let raw: String = self.request("eth_blockNumber", json!([])).await?;
        normalize_chain_id(raw.as_str())
            .map_err(|_| ConnectorError::External(format!("Invalid block number: {raw}")))
    }
}

impl NetworkProvider for JsonRpcProvider {
    fn rpc_url(&self) -> Option<&str> {
        Some(&self.rpc_url)
    }
}

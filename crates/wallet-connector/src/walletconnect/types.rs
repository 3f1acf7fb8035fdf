/*
[INPUT]:  WalletConnect session proposals, requests and responses
[OUTPUT]: Typed WalletConnect receiver data model
[POS]:    WalletConnect layer - wire-facing types
[UPDATE]: When the receiver handles new message shapes
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// EIP-1193 "user rejected request"
pub const USER_REJECTED_CODE: i64 = 4001;
/// EIP-1193 "unsupported method"
pub const UNSUPPORTED_METHOD_CODE: i64 = 4200;
/// WalletConnect "user rejected session"
pub const SESSION_REJECTED_CODE: i64 = 5000;
/// WalletConnect "user disconnected"
pub const USER_DISCONNECTED_CODE: i64 = 6000;

/// Receiver settings for acting as a WalletConnect responder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectConfig {
    #[serde(default)]
    pub enable_connect_app: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WcMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
}

impl WalletConnectConfig {
    pub fn enabled(project_id: impl Into<String>) -> Self {
        Self {
            enable_connect_app: true,
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }
}

/// Metadata the wallet advertises to dapps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<WcRedirect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcRedirect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcErrorResponse {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl WcErrorResponse {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request")
    }

    pub fn unsupported_method(method: &str) -> Self {
        Self::new(
            UNSUPPORTED_METHOD_CODE,
            format!("Unsupported method: {method}"),
        )
    }

    pub fn session_rejected() -> Self {
        Self::new(SESSION_REJECTED_CODE, "User rejected the session")
    }

    pub fn user_disconnected() -> Self {
        Self::new(USER_DISCONNECTED_CODE, "User disconnected")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcJsonRpcError {
    pub id: u64,
    pub jsonrpc: String,
    pub error: WcErrorResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcJsonRpcResult {
    pub id: u64,
    pub jsonrpc: String,
    pub result: Value,
}

/// Answer sent back for a session request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WcResponse {
    Result(WcJsonRpcResult),
    Error(WcJsonRpcError),
}

impl WcResponse {
    pub fn result(id: u64, result: Value) -> Self {
        WcResponse::Result(WcJsonRpcResult {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            result,
        })
    }

    pub fn error(id: u64, error: WcErrorResponse) -> Self {
        WcResponse::Error(WcJsonRpcError {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            error,
        })
    }

    pub fn id(&self) -> u64 {
        match self {
            WcResponse::Result(result) => result.id,
            WcResponse::Error(error) => error.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcProposerMetadata {
    pub name: String,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcPeer {
    pub metadata: WcProposerMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcProposal {
    pub id: u64,
    pub proposer: WcPeer,
}

/// JSON-RPC call forwarded from a connected dapp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcRequest {
    pub id: u64,
    pub topic: String,
    pub peer: WcPeer,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcSession {
    pub topic: String,
    pub peer: WcPeer,
}

/// Notification republished by the receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WcEvent {
    SessionProposal(WcProposal),
    SessionRequest(WcRequest),
    SessionDelete { topic: String },
}

impl WcEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WcEvent::SessionProposal(_) => "session_proposal",
            WcEvent::SessionRequest(_) => "session_request",
            WcEvent::SessionDelete { .. } => "session_delete",
        }
    }
}

/*
[INPUT]:  Connector transitions and normalized provider events
[OUTPUT]: Connector notifications, lifecycle state and auth outcomes
[POS]:    Data layer - what connectors publish upward
[UPDATE]: When adding notification kinds or lifecycle states
*/

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Chain half of a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainChange {
    pub id: u64,
    pub unsupported: bool,
}

/// Normalized change notification.
///
/// At most one of `account` / `chain` is populated per emission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainChange>,
}

impl ChangeEvent {
    pub fn account(address: impl Into<String>) -> Self {
        Self {
            account: Some(address.into()),
            chain: None,
        }
    }

    pub fn chain(id: u64, unsupported: bool) -> Self {
        Self {
            account: None,
            chain: Some(ChainChange { id, unsupported }),
        }
    }
}

/// Named notifications emitted by a connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ConnectorEvent {
    Connected,
    Disconnect,
    Change(ChangeEvent),
}

impl ConnectorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectorEvent::Connected => "connected",
            ConnectorEvent::Disconnect => "disconnect",
            ConnectorEvent::Change(_) => "change",
        }
    }
}

/// Connector lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectorState {
    #[default]
    Disconnected,
    Authenticating,
    Connected,
}

/// Result of an auth strategy that reports failures instead of raising them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthOutcome {
    Success { success: bool },
    Failed { error: String },
}

impl AuthOutcome {
    pub fn success() -> Self {
        AuthOutcome::Success { success: true }
    }

    pub fn failed(error: impl Display) -> Self {
        AuthOutcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Failed { error } => Some(error),
            AuthOutcome::Success { .. } => None,
        }
    }
}

/*
[INPUT]:  Client id and RPC endpoints
[OUTPUT]: Signer capabilities, network providers and provider event sources
[POS]:    Backend layer - external signer/provider abstraction
[UPDATE]: When signer capabilities or provider event kinds change
*/

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::RawChainId;

/// Provider event categories a connector listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
    Disconnect,
}

/// Raw event delivered by an upstream provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(RawChainId),
    Disconnect,
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
            ProviderEvent::Disconnect => ProviderEventKind::Disconnect,
        }
    }
}

/// Handle returned by [`ProviderEventSource::on`], used to deregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub type ProviderListener = Arc<dyn Fn(ProviderEvent) + Send + Sync>;

/// Subscription capability of a provider.
///
/// Implementations must not hold internal locks while invoking listeners:
/// a listener may call [`ProviderEventSource::off`] re-entrantly.
pub trait ProviderEventSource: Send + Sync {
    fn on(&self, kind: ProviderEventKind, listener: ProviderListener) -> ListenerId;

    /// Returns false when `id` was not registered
    fn off(&self, id: ListenerId) -> bool;
}

/// Network provider a signer is bound to
pub trait NetworkProvider: Send + Sync {
    fn rpc_url(&self) -> Option<&str>;

    /// Providers without event support return `None`
    fn event_source(&self) -> Option<&dyn ProviderEventSource> {
        None
    }
}

/// Opaque signer handle bound to at most one RPC endpoint
#[async_trait]
pub trait SignerCapability: Send + Sync {
    async fn address(&self) -> Result<String>;

    /// Return a new signer bound to `rpc_url`. Never mutates `self`.
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn SignerCapability>>;

    fn provider(&self) -> Option<Arc<dyn NetworkProvider>>;
}

/// Source of base signers for an authenticated session
#[async_trait]
pub trait SignerBackend: Send + Sync {
    /// `Ok(None)` when the backend has no signer for this client
    async fn fetch_signer(&self, client_id: &str) -> Result<Option<Arc<dyn SignerCapability>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_ids_are_unique() {
        assert_ne!(ListenerId::new(), ListenerId::new());
    }

    #[test]
    fn test_provider_event_kind() {
        assert_eq!(
            ProviderEvent::AccountsChanged(vec![]).kind(),
            ProviderEventKind::AccountsChanged
        );
        assert_eq!(
            ProviderEvent::ChainChanged(RawChainId::Number(1)).kind(),
            ProviderEventKind::ChainChanged
        );
        assert_eq!(ProviderEvent::Disconnect.kind(), ProviderEventKind::Disconnect);
    }
}

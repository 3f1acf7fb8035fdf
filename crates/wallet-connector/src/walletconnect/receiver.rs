/*
[INPUT]:  WalletConnect client callbacks and user approve/reject decisions
[OUTPUT]: Session approvals, JSON-RPC responses and WcEvent notifications
[POS]:    WalletConnect layer - responder-side session bookkeeping
[UPDATE]: When supporting new request methods or session flows
*/

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::types::{
    WalletConnectConfig, WcErrorResponse, WcEvent, WcProposal, WcRequest, WcResponse, WcSession,
};
use crate::backend::SignerCapability;
use crate::error::{ConnectorError, Result};
use crate::session::{read_guard, write_guard};

const WC_EVENT_CAPACITY: usize = 32;
const PAIRING_URI_SCHEME: &str = "wc:";

/// Transport-level WalletConnect client the receiver drives
#[async_trait]
pub trait WalletConnectClient: Send + Sync {
    async fn pair(&self, uri: &str) -> Result<()>;

    /// Approve `proposal` exposing CAIP-10 `accounts`
    async fn approve_session(
        &self,
        proposal: &WcProposal,
        accounts: Vec<String>,
        chain_id: u64,
    ) -> Result<WcSession>;

    async fn reject_session(&self, proposal: &WcProposal, reason: WcErrorResponse) -> Result<()>;

    async fn respond(&self, topic: &str, response: WcResponse) -> Result<()>;

    async fn disconnect_session(&self, topic: &str, reason: WcErrorResponse) -> Result<()>;

    fn active_sessions(&self) -> Vec<WcSession>;
}

/// Wallet-side WalletConnect responder.
///
/// Holds at most one pending proposal and one pending request; a newer
/// callback replaces the older one.
pub struct WalletConnectReceiver {
    config: WalletConnectConfig,
    client: Arc<dyn WalletConnectClient>,
    pending_proposal: RwLock<Option<WcProposal>>,
    pending_request: RwLock<Option<WcRequest>>,
    tx: broadcast::Sender<WcEvent>,
}

impl WalletConnectReceiver {
    pub fn new(config: WalletConnectConfig, client: Arc<dyn WalletConnectClient>) -> Self {
        let (tx, _rx) = broadcast::channel(WC_EVENT_CAPACITY);
        Self {
            config,
            client,
            pending_proposal: RwLock::new(None),
            pending_request: RwLock::new(None),
            tx,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enable_connect_app
    }

    pub fn config(&self) -> &WalletConnectConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WcEvent> {
        self.tx.subscribe()
    }

    /// Pair with a dapp from its `wc:` URI
    pub async fn connect_app(&self, uri: &str) -> Result<()> {
        if !self.is_enabled() {
            return Err(ConnectorError::WalletConnectDisabled);
        }
        let uri = uri.trim();
        if !uri.starts_with(PAIRING_URI_SCHEME) {
            return Err(ConnectorError::Config(format!(
                "Invalid WalletConnect URI: {uri}"
            )));
        }

        self.client.pair(uri).await?;
        info!("paired with dapp");
        Ok(())
    }

    pub fn on_session_proposal(&self, proposal: WcProposal) {
        debug!(id = proposal.id, peer = %proposal.proposer.metadata.name, "session proposal");
        *write_guard(&self.pending_proposal) = Some(proposal.clone());
        self.publish(WcEvent::SessionProposal(proposal));
    }

    pub fn on_session_request(&self, request: WcRequest) {
        debug!(id = request.id, method = %request.method, "session request");
        *write_guard(&self.pending_request) = Some(request.clone());
        self.publish(WcEvent::SessionRequest(request));
    }

    pub fn on_session_delete(&self, topic: &str) {
        info!(topic, "session deleted by peer");
        {
            let mut pending = write_guard(&self.pending_request);
            if pending.as_ref().is_some_and(|request| request.topic == topic) {
                *pending = None;
            }
        }
        self.publish(WcEvent::SessionDelete {
            topic: topic.to_string(),
        });
    }

    pub fn pending_proposal(&self) -> Option<WcProposal> {
        read_guard(&self.pending_proposal).clone()
    }

    pub fn pending_request(&self) -> Option<WcRequest> {
        read_guard(&self.pending_request).clone()
    }

    /// Approve the pending proposal with `wallet`'s account on `chain_id`
    pub async fn approve_session(
        &self,
        wallet: &dyn SignerCapability,
        chain_id: u64,
    ) -> Result<WcSession> {
        let proposal = self
            .pending_proposal()
            .ok_or(ConnectorError::NoPendingProposal)?;
        let address = wallet.address().await?;
        let accounts = vec![format!("eip155:{chain_id}:{address}")];

        let session = self
            .client
            .approve_session(&proposal, accounts, chain_id)
            .await?;
        self.take_proposal(proposal.id);
        info!(topic = %session.topic, peer = %session.peer.metadata.name, "session approved");
        Ok(session)
    }

    pub async fn reject_session(&self) -> Result<()> {
        let proposal = self
            .pending_proposal()
            .ok_or(ConnectorError::NoPendingProposal)?;

        self.client
            .reject_session(&proposal, WcErrorResponse::session_rejected())
            .await?;
        self.take_proposal(proposal.id);
        info!(id = proposal.id, "session rejected");
        Ok(())
    }

    /// Answer the pending request from `wallet`.
    ///
    /// Only account and chain queries are served; any other method gets an
    /// unsupported-method error response.
    pub async fn approve_request(&self, wallet: &dyn SignerCapability, chain_id: u64) -> Result<()> {
        let request = self
            .pending_request()
            .ok_or(ConnectorError::NoPendingRequest)?;

        let response = match request.method.as_str() {
            "eth_accounts" | "eth_requestAccounts" => {
                let address = wallet.address().await?;
                WcResponse::result(request.id, json!([address]))
            }
            "eth_chainId" => WcResponse::result(request.id, Value::String(format!("{chain_id:#x}"))),
            other => {
                warn!(method = other, "unsupported WalletConnect method");
                WcResponse::error(request.id, WcErrorResponse::unsupported_method(other))
            }
        };

        self.client.respond(&request.topic, response).await?;
        self.take_request(request.id);
        Ok(())
    }

    pub async fn reject_request(&self) -> Result<()> {
        let request = self
            .pending_request()
            .ok_or(ConnectorError::NoPendingRequest)?;

        self.client
            .respond(
                &request.topic,
                WcResponse::error(request.id, WcErrorResponse::user_rejected()),
            )
            .await?;
        self.take_request(request.id);
        debug!(id = request.id, "request rejected");
        Ok(())
    }

    pub fn active_sessions(&self) -> Vec<WcSession> {
        self.client.active_sessions()
    }

    /// Disconnect every active session
    pub async fn disconnect_session(&self) -> Result<()> {
        for session in self.client.active_sessions() {
            self.client
                .disconnect_session(&session.topic, WcErrorResponse::user_disconnected())
                .await?;
            info!(topic = %session.topic, "session disconnected");
        }
        *write_guard(&self.pending_request) = None;
        Ok(())
    }

    fn publish(&self, event: WcEvent) {
        debug!(event = event.name(), "walletconnect event");
        let _ = self.tx.send(event);
    }

    // only clear if no newer callback replaced it meanwhile
    fn take_proposal(&self, id: u64) {
        let mut pending = write_guard(&self.pending_proposal);
        if pending.as_ref().is_some_and(|proposal| proposal.id == id) {
            *pending = None;
        }
    }

    fn take_request(&self, id: u64) {
        let mut pending = write_guard(&self.pending_request);
        if pending.as_ref().is_some_and(|request| request.id == id) {
            *pending = None;
        }
    }
}

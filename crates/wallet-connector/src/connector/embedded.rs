/*
[INPUT]:  Connector options, auth/signer backends, credential store
[OUTPUT]: Connect/disconnect/switch-chain lifecycle and connector events
[POS]:    Connector layer - embedded wallet state machine
[UPDATE]: When lifecycle transitions or teardown order change
*/

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use super::{Connectable, EventBridge, EventChannel, SignerResolver};
use crate::backend::{AuthBackend, NetworkProvider, SignerBackend, SignerCapability};
use crate::error::{ConnectorError, Result};
use crate::session::{CredentialStore, Session, read_guard, write_guard};
use crate::types::{
    AuthOutcome, Chain, ChangeEvent, ConnectorEvent, ConnectorOptions, ConnectorState,
    LoginRequest,
};

/// Connector for an embedded (custodial) wallet service
pub struct EmbeddedWalletConnector {
    pub(super) client_id: String,
    active_chain: RwLock<Chain>,
    chains: Arc<RwLock<Vec<Chain>>>,
    pub(super) auth: Arc<dyn AuthBackend>,
    resolver: SignerResolver,
    pub(super) store: Arc<dyn CredentialStore>,
    pub(super) session: Session,
    pub(super) events: EventChannel,
    bridge: EventBridge,
    connect_permit: Mutex<()>,
}

impl EmbeddedWalletConnector {
    /// Create a connector, restoring the persisted session identity
    pub fn new(
        options: ConnectorOptions,
        auth: Arc<dyn AuthBackend>,
        signers: Arc<dyn SignerBackend>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        options.validate()?;

        let email = store.load()?;
        if let Some(email) = &email {
            debug!(%email, "restored session identity");
        }

        let session = Session::new(email);
        let events = EventChannel::new();
        let chains = Arc::new(RwLock::new(options.chains));
        let bridge = EventBridge::new(chains.clone(), events.clone(), session.clone(), store.clone());

        Ok(Self {
            resolver: SignerResolver::new(signers, options.client_id.clone()),
            client_id: options.client_id,
            active_chain: RwLock::new(options.chain),
            chains,
            auth,
            store,
            session,
            events,
            bridge,
            connect_permit: Mutex::new(()),
        })
    }

    /// Authenticate with `request` and return the connected address.
    ///
    /// Short-circuits when already connected. Concurrent calls are
    /// serialized; a waiting caller sees the first caller's session.
    pub async fn connect(&self, request: LoginRequest, chain_id: Option<u64>) -> Result<String> {
        let _permit = self.connect_permit.lock().await;

        if let Ok(address) = self.get_address().await {
            debug!(%address, "already connected");
            if !self.is_listening() {
                self.setup_listeners().await;
            }
            return Ok(address);
        }

        let login_type = request.login_type();
        info!(client_id = %self.client_id, login_type = login_type.as_str(), "connecting");

        let outcome = match request {
            LoginRequest::SocialOAuth {
                provider,
                redirect_url,
            } => self.social_login(provider, redirect_url.as_deref()).await?,
            LoginRequest::OtpVerification { otp } => self.verify_email_otp(&otp).await?,
            LoginRequest::Jwt { jwt, password } => {
                self.custom_jwt(&jwt, password.as_deref()).await?
            }
        };

        if let AuthOutcome::Failed { error } = outcome {
            return Err(ConnectorError::AuthenticationFailed(error));
        }

        if let Some(chain_id) = chain_id {
            self.switch_chain(chain_id).await?;
        }

        self.setup_listeners().await;

        let address = self.get_address().await?;
        info!(%address, chain_id = self.active_chain().id, "connected");
        Ok(address)
    }

    /// Tear the session down. Safe to call when already disconnected.
    ///
    /// Local teardown always completes; a failed backend logout or store
    /// clear is reported afterwards.
    pub async fn disconnect(&self) -> Result<()> {
        let cleared = self.store.clear();
        if let Err(err) = &cleared {
            warn!(error = %err, "failed to clear stored session");
        }

        // the backend may still hold a session after a local-only teardown
        let logout = self.auth.logout(&self.client_id).await;
        if let Err(err) = &logout {
            warn!(error = %err, "backend logout failed");
        }

        self.bridge.unsubscribe();
        self.session.clear();
        self.events.emit(ConnectorEvent::Disconnect);
        info!(client_id = %self.client_id, "disconnected");

        cleared.and(logout)
    }

    /// Address of the current signer, resolving it if needed
    pub async fn get_address(&self) -> Result<String> {
        let signer = self.get_signer().await.map_err(|err| match err {
            ConnectorError::SignerUnavailable(_) => err,
            other => ConnectorError::SignerUnavailable(other.to_string()),
        })?;
        signer
            .address()
            .await
            .map_err(|err| ConnectorError::SignerUnavailable(err.to_string()))
    }

    /// True iff an address can be resolved. Never fails.
    pub async fn is_connected(&self) -> bool {
        match self.get_address().await {
            Ok(address) => !address.is_empty(),
            Err(err) => {
                debug!(error = %err, "not connected");
                false
            }
        }
    }

    pub async fn is_authorized(&self) -> bool {
        self.is_connected().await
    }

    /// Network provider behind the current signer
    pub async fn get_provider(&self) -> Result<Arc<dyn NetworkProvider>> {
        self.get_signer()
            .await?
            .provider()
            .ok_or(ConnectorError::ProviderUnavailable)
    }

    /// Cached signer, or a freshly resolved one for the active chain
    pub async fn get_signer(&self) -> Result<Arc<dyn SignerCapability>> {
        if let Some(signer) = self.session.signer() {
            return Ok(signer);
        }
        if !self.session.is_authenticated() {
            return Err(ConnectorError::SignerUnavailable(
                "not authenticated".to_string(),
            ));
        }

        let chain = self.active_chain();
        let candidate = self.resolver.resolve(&chain).await?;
        self.session.cache_signer(candidate).ok_or_else(|| {
            ConnectorError::SignerUnavailable("session ended while resolving signer".to_string())
        })
    }

    /// Rebind the signer to `chain_id` and announce the change.
    ///
    /// The event bridge keeps its existing subscription.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let chain = self
            .find_chain(chain_id)
            .ok_or(ConnectorError::ChainNotConfigured { chain_id })?;

        if !self.session.is_authenticated() {
            return Err(ConnectorError::SignerUnavailable(
                "not authenticated".to_string(),
            ));
        }

        let signer = self.resolver.resolve(&chain).await?;
        if !self.session.replace_signer(signer) {
            return Err(ConnectorError::SignerUnavailable(
                "session ended during chain switch".to_string(),
            ));
        }
        *write_guard(&self.active_chain) = chain;

        info!(chain_id, "switched chain");
        self.events.emit(ConnectorEvent::Change(ChangeEvent::chain(
            chain_id, false,
        )));
        Ok(())
    }

    /// Replace the supported chain set. Emits nothing; the signer is untouched.
    pub fn update_chains(&self, chains: Vec<Chain>) {
        debug!(count = chains.len(), "updating supported chains");
        *write_guard(&self.chains) = chains;
    }

    pub fn get_email(&self) -> Option<String> {
        self.session.email()
    }

    /// Lifecycle state. A restored identity counts as connected once its
    /// signer resolves.
    pub async fn state(&self) -> ConnectorState {
        let state = self.session.state();
        if state == ConnectorState::Disconnected
            && self.session.is_authenticated()
            && self.is_connected().await
        {
            return ConnectorState::Connected;
        }
        state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.events.subscribe()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn active_chain(&self) -> Chain {
        read_guard(&self.active_chain).clone()
    }

    pub fn chains(&self) -> Vec<Chain> {
        read_guard(&self.chains).clone()
    }

    pub fn is_listening(&self) -> bool {
        self.bridge.is_subscribed()
    }

    fn find_chain(&self, chain_id: u64) -> Option<Chain> {
        read_guard(&self.chains)
            .iter()
            .find(|chain| chain.id == chain_id)
            .cloned()
    }

    /// Bridge events from the current provider. Returns whether a
    /// subscription is active afterwards.
    pub async fn setup_listeners(&self) -> bool {
        match self.get_provider().await {
            Ok(provider) => self.bridge.subscribe(provider),
            Err(err) => {
                debug!(error = %err, "no provider to listen on");
                false
            }
        }
    }
}

#[async_trait]
impl Connectable for EmbeddedWalletConnector {
    async fn connect(&self, request: LoginRequest, chain_id: Option<u64>) -> Result<String> {
        EmbeddedWalletConnector::connect(self, request, chain_id).await
    }

    async fn disconnect(&self) -> Result<()> {
        EmbeddedWalletConnector::disconnect(self).await
    }

    async fn get_address(&self) -> Result<String> {
        EmbeddedWalletConnector::get_address(self).await
    }

    async fn is_connected(&self) -> bool {
        EmbeddedWalletConnector::is_connected(self).await
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        EmbeddedWalletConnector::switch_chain(self, chain_id).await
    }

    fn update_chains(&self, chains: Vec<Chain>) {
        EmbeddedWalletConnector::update_chains(self, chains)
    }

    fn active_chain(&self) -> Chain {
        EmbeddedWalletConnector::active_chain(self)
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        EmbeddedWalletConnector::subscribe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockAuthBackend, MockSignerBackend, ProviderEvent};
    use crate::session::MemoryCredentialStore;

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    struct Harness {
        connector: EmbeddedWalletConnector,
        auth: Arc<MockAuthBackend>,
        signers: Arc<MockSignerBackend>,
        store: Arc<MemoryCredentialStore>,
    }

    fn options() -> ConnectorOptions {
        let ethereum = Chain::new(1, "ethereum").with_rpc("https://eth.example.org");
        let polygon = Chain::new(137, "polygon").with_rpc("https://polygon.example.org");
        ConnectorOptions::new("client-1", ethereum.clone(), vec![ethereum, polygon])
    }

    fn harness_with(auth: MockAuthBackend, store: MemoryCredentialStore) -> Harness {
        let auth = Arc::new(auth);
        let signers = Arc::new(MockSignerBackend::new(ADDRESS));
        let store = Arc::new(store);
        let connector =
            EmbeddedWalletConnector::new(options(), auth.clone(), signers.clone(), store.clone())
                .unwrap();
        Harness {
            connector,
            auth,
            signers,
            store,
        }
    }

    fn harness() -> Harness {
        harness_with(MockAuthBackend::new("a@b.com"), MemoryCredentialStore::new())
    }

    #[tokio::test]
    async fn test_jwt_connect_scenario() {
        let h = harness();
        let address = h
            .connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();

        assert_eq!(address, ADDRESS);
        assert_eq!(h.connector.get_email(), Some("a@b.com".to_string()));
        assert!(h.connector.is_connected().await);
        assert_eq!(h.connector.state().await, ConnectorState::Connected);
        assert_eq!(h.store.load().unwrap(), Some("a@b.com".to_string()));
        assert!(h.connector.is_listening());
    }

    #[tokio::test]
    async fn test_repeated_connect_skips_auth_backend() {
        let h = harness();
        let first = h
            .connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();
        let second = h
            .connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(h.auth.call_count("verify_jwt"), 1);
    }

    #[tokio::test]
    async fn test_connect_with_chain_switches_before_listening() {
        let h = harness();
        let mut rx = h.connector.subscribe();
        h.connector
            .connect(LoginRequest::jwt("abc", None), Some(137))
            .await
            .unwrap();

        assert_eq!(h.connector.active_chain().id, 137);
        let provider = h.connector.get_provider().await.unwrap();
        assert_eq!(provider.rpc_url(), Some("https://polygon.example.org"));

        assert_eq!(rx.try_recv().unwrap(), ConnectorEvent::Connected);
        assert_eq!(
            rx.try_recv().unwrap(),
            ConnectorEvent::Change(ChangeEvent::chain(137, false))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_with_unknown_chain_fails() {
        let h = harness();
        let err = h
            .connector
            .connect(LoginRequest::jwt("abc", None), Some(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::ChainNotConfigured { chain_id: 10 }));
    }

    #[tokio::test]
    async fn test_disconnect_clears_everything() {
        let h = harness();
        h.connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();

        h.connector.disconnect().await.unwrap();

        assert!(!h.connector.is_connected().await);
        assert!(h.connector.get_email().is_none());
        assert_eq!(h.store.load().unwrap(), None);
        assert!(!h.connector.is_listening());
        assert_eq!(h.connector.state().await, ConnectorState::Disconnected);
        assert_eq!(h.auth.call_count("logout"), 1);
    }

    #[tokio::test]
    async fn test_disconnect_when_disconnected_is_ok() {
        let h = harness();
        assert!(h.connector.disconnect().await.is_ok());
        assert!(h.connector.disconnect().await.is_ok());
        assert_eq!(h.auth.call_count("logout"), 2);
    }

    #[tokio::test]
    async fn test_disconnect_after_upstream_teardown_logs_out() {
        let h = harness();
        h.connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();

        h.signers
            .events()
            .unwrap()
            .emit(ProviderEvent::AccountsChanged(vec![]));
        assert!(!h.connector.is_connected().await);
        assert_eq!(h.auth.call_count("logout"), 0);

        h.connector.disconnect().await.unwrap();
        assert_eq!(h.auth.calls(), vec!["verify_jwt", "logout"]);
    }

    #[tokio::test]
    async fn test_restored_identity_resumes_without_auth() {
        let h = harness_with(
            MockAuthBackend::new("a@b.com"),
            MemoryCredentialStore::with_email("a@b.com"),
        );
        assert_eq!(h.connector.get_email(), Some("a@b.com".to_string()));
        assert_eq!(h.connector.state().await, ConnectorState::Connected);

        let address = h
            .connector
            .connect(LoginRequest::otp("123456"), None)
            .await
            .unwrap();
        assert_eq!(address, ADDRESS);
        assert!(h.auth.calls().is_empty());
        assert!(h.connector.is_listening());
    }

    #[tokio::test]
    async fn test_get_address_unauthenticated() {
        let h = harness();
        let err = h.connector.get_address().await.unwrap_err();
        assert!(matches!(err, ConnectorError::SignerUnavailable(_)));
        assert!(!h.connector.is_connected().await);
        assert_eq!(h.signers.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_restored_identity_without_signer_is_disconnected() {
        let h = harness_with(
            MockAuthBackend::new("a@b.com"),
            MemoryCredentialStore::with_email("a@b.com"),
        );
        h.signers.set_available(false);
        assert_eq!(h.connector.state().await, ConnectorState::Disconnected);
    }

    #[tokio::test]
    async fn test_get_address_maps_fetch_failure() {
        let h = harness_with(
            MockAuthBackend::new("a@b.com"),
            MemoryCredentialStore::with_email("a@b.com"),
        );
        h.signers.set_available(false);
        let err = h.connector.get_address().await.unwrap_err();
        match err {
            ConnectorError::SignerUnavailable(reason) => {
                assert_eq!(reason, "Error fetching the signer")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signer_is_cached() {
        let h = harness_with(
            MockAuthBackend::new("a@b.com"),
            MemoryCredentialStore::with_email("a@b.com"),
        );
        let first = h.connector.get_signer().await.unwrap();
        let second = h.connector.get_signer().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(h.signers.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_switch_chain_unknown_keeps_signer() {
        let h = harness();
        h.connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();
        let before = h.connector.get_signer().await.unwrap();
        let mut rx = h.connector.subscribe();

        let err = h.connector.switch_chain(42).await.unwrap_err();
        assert!(matches!(err, ConnectorError::ChainNotConfigured { chain_id: 42 }));

        let after = h.connector.get_signer().await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(h.connector.active_chain().id, 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_switch_chain_replaces_signer_and_emits_once() {
        let h = harness();
        h.connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();
        let before = h.connector.get_signer().await.unwrap();
        let mut rx = h.connector.subscribe();

        h.connector.switch_chain(137).await.unwrap();

        let after = h.connector.get_signer().await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(
            rx.try_recv().unwrap(),
            ConnectorEvent::Change(ChangeEvent::chain(137, false))
        );
        assert!(rx.try_recv().is_err());
        // bridge is not rebound on switch
        assert!(h.connector.is_listening());
    }

    #[tokio::test]
    async fn test_update_chains_is_silent() {
        let h = harness();
        let mut rx = h.connector.subscribe();
        h.connector.update_chains(vec![Chain::new(10, "optimism")]);
        assert_eq!(h.connector.chains().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_chains_feeds_unsupported_flag() {
        let h = harness();
        h.connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();
        h.connector.update_chains(vec![Chain::new(10, "optimism")]);
        let mut rx = h.connector.subscribe();

        let events = h.signers.events().unwrap();
        events.emit(ProviderEvent::ChainChanged(1u64.into()));
        events.emit(ProviderEvent::ChainChanged("10".into()));

        assert_eq!(
            rx.try_recv().unwrap(),
            ConnectorEvent::Change(ChangeEvent::chain(1, true))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ConnectorEvent::Change(ChangeEvent::chain(10, false))
        );
    }

    #[tokio::test]
    async fn test_get_provider_without_rpc() {
        let chain = Chain::new(1, "ethereum");
        let options = ConnectorOptions::new("client-1", chain.clone(), vec![chain]);
        let connector = EmbeddedWalletConnector::new(
            options,
            Arc::new(MockAuthBackend::new("a@b.com")),
            Arc::new(MockSignerBackend::new(ADDRESS)),
            Arc::new(MemoryCredentialStore::new()),
        )
        .unwrap();

        connector
            .connect(LoginRequest::jwt("abc", None), None)
            .await
            .unwrap();
        assert!(matches!(
            connector.get_provider().await.err(),
            Some(ConnectorError::ProviderUnavailable)
        ));
        assert!(!connector.is_listening());
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let chain = Chain::new(1, "ethereum");
        let options = ConnectorOptions::new("", chain.clone(), vec![chain]);
        let result = EmbeddedWalletConnector::new(
            options,
            Arc::new(MockAuthBackend::new("a@b.com")),
            Arc::new(MockSignerBackend::new(ADDRESS)),
            Arc::new(MemoryCredentialStore::new()),
        );
        assert!(matches!(result, Err(ConnectorError::Config(_))));
    }
}

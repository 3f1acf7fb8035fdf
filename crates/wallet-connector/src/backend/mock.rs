/*
[INPUT]:  Predetermined emails, addresses and failure switches
[OUTPUT]: In-memory auth/signer/provider backends for tests and demos
[POS]:    Backend layer - mock implementations of external collaborators
[UPDATE]: When backend traits change
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use super::{
    AuthBackend, AuthenticatedUser, ListenerId, NetworkProvider, ProviderEvent,
    ProviderEventKind, ProviderEventSource, ProviderListener, SignerBackend, SignerCapability,
};
use crate::error::{ConnectorError, Result};
use crate::session::{read_guard, write_guard};
use crate::types::OauthProvider;

/// Mock auth backend returning a fixed email.
///
/// Records every call by method name. Login methods fail while a failure
/// message is set; `logout` always succeeds.
#[derive(Debug)]
pub struct MockAuthBackend {
    email: String,
    failure: RwLock<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockAuthBackend {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            failure: RwLock::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose login methods fail with `message`
    pub fn failing(message: &str) -> Self {
        let backend = Self::new("");
        backend.set_failure(Some(message));
        backend
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *write_guard(&self.failure) = message.map(str::to_string);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|call| *call == method).count()
    }

    fn record(&self, method: &str) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(method.to_string());
    }

    fn check(&self) -> Result<()> {
        match read_guard(&self.failure).as_ref() {
            Some(message) => Err(ConnectorError::External(message.clone())),
            None => Ok(()),
        }
    }

    fn user(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            email: self.email.clone(),
        }
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn send_otp(&self, _email: &str, _client_id: &str) -> Result<()> {
        self.record("send_otp");
        self.check()
    }

    async fn verify_otp(&self, _email: &str, _otp: &str, _client_id: &str) -> Result<()> {
        self.record("verify_otp");
        self.check()
    }

    async fn social_login(
        &self,
        _provider: OauthProvider,
        _redirect_url: Option<&str>,
        _client_id: &str,
    ) -> Result<AuthenticatedUser> {
        self.record("social_login");
        self.check()?;
        Ok(self.user())
    }

    async fn verify_jwt(
        &self,
        _jwt: &str,
        _password: Option<&str>,
        _client_id: &str,
    ) -> Result<AuthenticatedUser> {
        self.record("verify_jwt");
        self.check()?;
        Ok(self.user())
    }

    async fn logout(&self, _client_id: &str) -> Result<()> {
        self.record("logout");
        Ok(())
    }
}

/// Event source whose listeners are fired by [`MockEventSource::emit`]
#[derive(Default)]
pub struct MockEventSource {
    listeners: RwLock<HashMap<ListenerId, (ProviderEventKind, ProviderListener)>>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener registered for its kind
    pub fn emit(&self, event: ProviderEvent) {
        let kind = event.kind();
        let listeners: Vec<ProviderListener> = read_guard(&self.listeners)
            .values()
            .filter(|(registered, _)| *registered == kind)
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        read_guard(&self.listeners).len()
    }
}

impl ProviderEventSource for MockEventSource {
    fn on(&self, kind: ProviderEventKind, listener: ProviderListener) -> ListenerId {
        let id = ListenerId::new();
        write_guard(&self.listeners).insert(id, (kind, listener));
        id
    }

    fn off(&self, id: ListenerId) -> bool {
        write_guard(&self.listeners).remove(&id).is_some()
    }
}

/// Provider bound to an RPC URL, optionally exposing a shared event source
pub struct MockProvider {
    rpc_url: String,
    events: Option<Arc<MockEventSource>>,
}

impl MockProvider {
    pub fn new(rpc_url: &str, events: Option<Arc<MockEventSource>>) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            events,
        }
    }
}

impl NetworkProvider for MockProvider {
    fn rpc_url(&self) -> Option<&str> {
        Some(&self.rpc_url)
    }

    fn event_source(&self) -> Option<&dyn ProviderEventSource> {
        self.events
            .as_deref()
            .map(|events| events as &dyn ProviderEventSource)
    }
}

/// Signer with a fixed address
pub struct MockSigner {
    address: String,
    provider: Option<Arc<MockProvider>>,
    events: Option<Arc<MockEventSource>>,
}

impl MockSigner {
    pub fn new(address: &str, events: Option<Arc<MockEventSource>>) -> Self {
        Self {
            address: address.to_string(),
            provider: None,
            events,
        }
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.provider.as_ref().map(|provider| provider.rpc_url.as_str())
    }
}

#[async_trait]
impl SignerCapability for MockSigner {
    async fn address(&self) -> Result<String> {
        Ok(self.address.clone())
    }

    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn SignerCapability>> {
        let provider = MockProvider::new(rpc_url, self.events.clone());
        Ok(Arc::new(MockSigner {
            address: self.address.clone(),
            provider: Some(Arc::new(provider)),
            events: self.events.clone(),
        }))
    }

    fn provider(&self) -> Option<Arc<dyn NetworkProvider>> {
        self.provider
            .clone()
            .map(|provider| provider as Arc<dyn NetworkProvider>)
    }
}

/// Signer backend handing out [`MockSigner`]s.
///
/// Every provider created from its signers shares one event source, so tests
/// can drive upstream events through [`MockSignerBackend::events`].
pub struct MockSignerBackend {
    address: String,
    available: AtomicBool,
    fetch_count: AtomicUsize,
    events: Option<Arc<MockEventSource>>,
}

impl MockSignerBackend {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            available: AtomicBool::new(true),
            fetch_count: AtomicUsize::new(0),
            events: Some(Arc::new(MockEventSource::new())),
        }
    }

    /// Backend whose providers expose no event source
    pub fn without_events(address: &str) -> Self {
        Self {
            events: None,
            ..Self::new(address)
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Option<Arc<MockEventSource>> {
        self.events.clone()
    }
}

#[async_trait]
impl SignerBackend for MockSignerBackend {
    async fn fetch_signer(&self, _client_id: &str) -> Result<Option<Arc<dyn SignerCapability>>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(Arc::new(MockSigner::new(
            &self.address,
            self.events.clone(),
        ))))
    }
}

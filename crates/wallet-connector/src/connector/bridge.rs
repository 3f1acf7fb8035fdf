/*
[INPUT]:  Provider events (accountsChanged, chainChanged, disconnect)
[OUTPUT]: Normalized connector change/disconnect notifications
[POS]:    Connector layer - upstream event normalization
[UPDATE]: When provider event kinds or normalization rules change
*/

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use tracing::{debug, info, warn};

use super::EventChannel;
use crate::backend::{
    ListenerId, NetworkProvider, ProviderEvent, ProviderEventKind, ProviderListener,
};
use crate::session::{CredentialStore, Session, read_guard};
use crate::types::{Chain, ChangeEvent, ConnectorEvent, normalize_address};

const BRIDGED_KINDS: [ProviderEventKind; 3] = [
    ProviderEventKind::AccountsChanged,
    ProviderEventKind::ChainChanged,
    ProviderEventKind::Disconnect,
];

struct Subscription {
    provider: Arc<dyn NetworkProvider>,
    listeners: Vec<ListenerId>,
}

struct BridgeInner {
    chains: Arc<RwLock<Vec<Chain>>>,
    events: EventChannel,
    session: Session,
    store: Arc<dyn CredentialStore>,
    subscription: Mutex<Option<Subscription>>,
}

/// Republishes provider events as connector notifications.
///
/// Listeners hold a weak reference to the bridge, so a dropped connector
/// leaves only inert closures behind in the provider.
#[derive(Clone)]
pub struct EventBridge {
    inner: Arc<BridgeInner>,
}

impl EventBridge {
    pub fn new(
        chains: Arc<RwLock<Vec<Chain>>>,
        events: EventChannel,
        session: Session,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                chains,
                events,
                session,
                store,
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Register handlers on `provider`.
    ///
    /// Returns false when the provider exposes no event source. An existing
    /// subscription is released first.
    pub fn subscribe(&self, provider: Arc<dyn NetworkProvider>) -> bool {
        self.unsubscribe();

        let Some(source) = provider.event_source() else {
            debug!("provider does not support events; bridge idle");
            return false;
        };

        let listeners = BRIDGED_KINDS
            .iter()
            .map(|kind| {
                let weak = Arc::downgrade(&self.inner);
                let listener: ProviderListener = Arc::new(move |event| {
                    if let Some(inner) = Weak::upgrade(&weak) {
                        inner.handle(event);
                    }
                });
                source.on(*kind, listener)
            })
            .collect();

        *self.inner.lock_subscription() = Some(Subscription {
            provider: provider.clone(),
            listeners,
        });
        debug!(rpc_url = provider.rpc_url().unwrap_or(""), "event bridge subscribed");
        true
    }

    /// Remove all handlers. Idempotent; returns whether anything was removed.
    pub fn unsubscribe(&self) -> bool {
        self.inner.unsubscribe()
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.lock_subscription().is_some()
    }
}

impl BridgeInner {
    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn unsubscribe(&self) -> bool {
        // take under the lock, call `off` outside it
        let Some(subscription) = self.lock_subscription().take() else {
            return false;
        };

        if let Some(source) = subscription.provider.event_source() {
            for id in subscription.listeners {
                source.off(id);
            }
        }
        debug!("event bridge unsubscribed");
        true
    }

    fn handle(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts),
            ProviderEvent::ChainChanged(raw) => match raw.normalize() {
                Ok(id) => self.on_chain_changed(id),
                Err(err) => warn!(error = %err, "dropping chainChanged with invalid id"),
            },
            ProviderEvent::Disconnect => self.on_disconnect(),
        }
    }

    fn on_accounts_changed(&self, accounts: Vec<String>) {
        let Some(first) = accounts.first() else {
            self.on_disconnect();
            return;
        };

        match normalize_address(first) {
            Ok(address) => self
                .events
                .emit(ConnectorEvent::Change(ChangeEvent::account(address))),
            Err(err) => warn!(error = %err, "dropping accountsChanged with invalid address"),
        }
    }

    fn on_chain_changed(&self, id: u64) {
        let unsupported = !read_guard(&self.chains).iter().any(|chain| chain.id == id);
        self.events
            .emit(ConnectorEvent::Change(ChangeEvent::chain(id, unsupported)));
    }

    fn on_disconnect(&self) {
        self.unsubscribe();
        self.session.clear();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored session after upstream disconnect");
        }
        info!("upstream provider disconnected");
        self.events.emit(ConnectorEvent::Disconnect);
    }
}

/*
[INPUT]:  Auth results, resolved signers and teardown requests
[OUTPUT]: Shared session identity, cached signer and lifecycle state
[POS]:    Session layer - in-memory session owned by one connector
[UPDATE]: When session fields or caching rules change
*/

use std::fmt;
use std::sync::{Arc, RwLock};

use super::{read_guard, write_guard};
use crate::backend::SignerCapability;
use crate::types::ConnectorState;

#[derive(Default)]
struct SessionData {
    email: Option<String>,
    pending_email: Option<String>,
    signer: Option<Arc<dyn SignerCapability>>,
    authenticating: usize,
}

/// Thread-safe session shared by a connector and its event bridge.
///
/// A cached signer is only ever stored while an email is present.
#[derive(Clone, Default)]
pub struct Session {
    data: Arc<RwLock<SessionData>>,
}

impl Session {
    pub fn new(email: Option<String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(SessionData {
                email,
                ..SessionData::default()
            })),
        }
    }

    pub fn email(&self) -> Option<String> {
        read_guard(&self.data).email.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        read_guard(&self.data).email.is_some()
    }

    /// Record an authenticated identity. A different user drops the cached signer.
    pub fn authenticate(&self, email: String) {
        let mut guard = write_guard(&self.data);
        if guard.email.as_deref() != Some(email.as_str()) {
            guard.signer = None;
        }
        guard.email = Some(email);
    }

    pub fn pending_email(&self) -> Option<String> {
        read_guard(&self.data).pending_email.clone()
    }

    pub fn set_pending_email(&self, email: Option<String>) {
        write_guard(&self.data).pending_email = email;
    }

    pub fn signer(&self) -> Option<Arc<dyn SignerCapability>> {
        read_guard(&self.data).signer.clone()
    }

    pub fn has_signer(&self) -> bool {
        read_guard(&self.data).signer.is_some()
    }

    /// Cache `candidate` unless a signer is already current.
    ///
    /// Returns the current signer, or `None` when the session is not
    /// authenticated (e.g. it was torn down while the signer was resolving).
    pub fn cache_signer(
        &self,
        candidate: Arc<dyn SignerCapability>,
    ) -> Option<Arc<dyn SignerCapability>> {
        let mut guard = write_guard(&self.data);
        guard.email.as_ref()?;
        if let Some(current) = &guard.signer {
            return Some(current.clone());
        }
        guard.signer = Some(candidate.clone());
        Some(candidate)
    }

    /// Replace the current signer. Returns false when not authenticated.
    pub fn replace_signer(&self, signer: Arc<dyn SignerCapability>) -> bool {
        let mut guard = write_guard(&self.data);
        if guard.email.is_none() {
            return false;
        }
        guard.signer = Some(signer);
        true
    }

    /// Drop identity, pending email and signer
    pub fn clear(&self) {
        let mut guard = write_guard(&self.data);
        guard.email = None;
        guard.pending_email = None;
        guard.signer = None;
    }

    /// State derived from the cached signer; an identity alone is not `Connected`
    pub fn state(&self) -> ConnectorState {
        let guard = read_guard(&self.data);
        if guard.signer.is_some() {
            ConnectorState::Connected
        } else if guard.authenticating > 0 {
            ConnectorState::Authenticating
        } else {
            ConnectorState::Disconnected
        }
    }

    /// Mark an auth flow in flight until the guard is dropped
    pub fn begin_authentication(&self) -> AuthenticationGuard {
        write_guard(&self.data).authenticating += 1;
        AuthenticationGuard {
            session: self.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = read_guard(&self.data);
        f.debug_struct("Session")
            .field("email", &guard.email)
            .field("pending_email", &guard.pending_email)
            .field("has_signer", &guard.signer.is_some())
            .field("authenticating", &guard.authenticating)
            .finish()
    }
}

/// Clears the authenticating mark on drop, including when a flow is abandoned
#[must_use]
pub struct AuthenticationGuard {
    session: Session,
}

impl Drop for AuthenticationGuard {
    fn drop(&mut self) {
        let mut guard = write_guard(&self.session.data);
        guard.authenticating = guard.authenticating.saturating_sub(1);
    }
}

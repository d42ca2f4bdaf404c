//! Session state: who, if anyone, is logged in.

use super::notify::{ListenerId, Notifier};
use super::providers::IdentityProvider;
use super::types::Identity;
use crate::error::SessionError;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    identity: Mutex<Option<Identity>>,
    provider: Arc<dyn IdentityProvider>,
    notifier: Notifier<Option<Identity>>,
    /// Forwards provider-side identity changes into this session.
    bridge: Mutex<Option<JoinHandle<()>>>,
}

impl SessionState {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                identity: Mutex::new(None),
                provider,
                notifier: Notifier::new(),
                bridge: Mutex::new(None),
            }),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.identity.lock().clone()
    }

    pub fn logged_in(&self) -> bool {
        self.inner.identity.lock().is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider.name()
    }

    pub fn subscribe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&Option<Identity>) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    pub fn stream(&self) -> broadcast::Receiver<Option<Identity>> {
        self.inner.notifier.stream()
    }

    /// Returns `Ok(false)` when already logged in as the same identity.
    pub fn login(&self, identity: Identity) -> Result<bool, SessionError> {
        {
            let mut current = self.inner.identity.lock();
            if let Some(existing) = current.as_ref() {
                if existing.id == identity.id {
                    return Ok(false);
                }
                return Err(SessionError::AlreadyLoggedIn {
                    current: existing.id.clone(),
                    requested: identity.id,
                });
            }
            *current = Some(identity.clone());
        }

        tracing::info!(identity = %identity.id, "session: logged in");
        self.inner.notifier.notify(&Some(identity));
        Ok(true)
    }

    /// Clears the session and signs out at the provider in the background.
    /// Returns `false` (and notifies nobody) when already logged out.
    pub fn logout(&self) -> bool {
        if !self.clear() {
            return false;
        }
        self.spawn_sign_out();
        true
    }

    /// Ask the provider for an identity, then log it in.
    pub async fn sign_in(&self) -> Result<Identity, SessionError> {
        let identity = self
            .inner
            .provider
            .sign_in()
            .await
            .map_err(SessionError::SignIn)?;
        self.login(identity.clone())?;
        Ok(identity)
    }

    /// One-time provider bootstrap: initialize, follow provider-side changes,
    /// and restore a stored credential if there is one.
    pub async fn bootstrap(&self) -> anyhow::Result<()> {
        let provider = Arc::clone(&self.inner.provider);
        provider.initialize().await?;

        if let Some(rx) = provider.changes() {
            self.bind_changes(rx);
        }

        if let Some(identity) = provider.current_identity().await? {
            tracing::info!(identity = %identity.id, "session: restoring stored credential");
            if let Err(e) = self.login(identity) {
                tracing::warn!("session: stored credential ignored: {e}");
            }
        }

        Ok(())
    }

    /// Stop following provider-side changes.
    pub fn shutdown(&self) {
        if let Some(handle) = self.inner.bridge.lock().take() {
            handle.abort();
        }
    }

    fn clear(&self) -> bool {
        let Some(previous) = self.inner.identity.lock().take() else {
            return false;
        };
        tracing::info!(identity = %previous.id, "session: logged out");
        self.inner.notifier.notify(&None);
        true
    }

    fn spawn_sign_out(&self) {
        let provider = Arc::clone(&self.inner.provider);
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    if let Err(e) = provider.sign_out().await {
                        tracing::warn!(provider = provider.name(), "sign-out failed: {e:#}");
                    }
                });
            }
            Err(_) => tracing::warn!("session: no async runtime, provider sign-out skipped"),
        }
    }

    fn bind_changes(&self, mut rx: broadcast::Receiver<Option<Identity>>) {
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        let Some(inner) = weak.upgrade() else { break };
                        SessionState { inner }.apply_external(change);
                    }
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("session: missed {n} provider identity changes");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(old) = self.inner.bridge.lock().replace(handle) {
            old.abort();
        }
    }

    /// Provider already knows about the change, so no provider sign-out here.
    fn apply_external(&self, change: Option<Identity>) {
        match change {
            None => {
                self.clear();
            }
            Some(identity) => {
                if let Err(SessionError::AlreadyLoggedIn { current, .. }) =
                    self.login(identity.clone())
                {
                    tracing::info!(from = %current, to = %identity.id, "session: identity switched by provider");
                    self.clear();
                    if let Err(e) = self.login(identity) {
                        tracing::warn!("session: provider identity ignored: {e}");
                    }
                }
            }
        }
    }
}

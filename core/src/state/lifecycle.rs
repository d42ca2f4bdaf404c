//! App lifecycle: derives the coarse phase from the splash timer, the session
//! and the workspace, and owns workspace resolution.

use super::notify::{ListenerId, Notifier};
use super::providers::WorkspaceProvider;
use super::session::SessionState;
use super::transitions::StateTransition;
use super::types::{Identity, LifecycleSnapshot, Phase, Workspace};
use crate::config::LifecycleConfig;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct AppLifecycle {
    inner: Arc<LifecycleInner>,
}

struct LifecycleInner {
    cfg: LifecycleConfig,
    session: SessionState,
    workspaces: Arc<dyn WorkspaceProvider>,
    data: Mutex<LifecycleData>,
    notifier: Notifier<LifecycleSnapshot>,
    session_listener: Mutex<Option<ListenerId>>,
}

struct LifecycleData {
    started: bool,
    splash_elapsed: bool,
    identity: Option<String>,
    workspace: Option<Workspace>,
    /// Bumped on every session change; resolutions carry the value they started with.
    generation: u64,
    resolving: Option<JoinHandle<()>>,
    published: LifecycleSnapshot,
}

impl AppLifecycle {
    /// Attaches to `session` right away, so changes made before [`start`](Self::start)
    /// are not missed.
    pub fn new(
        cfg: LifecycleConfig,
        session: SessionState,
        workspaces: Arc<dyn WorkspaceProvider>,
    ) -> Self {
        let identity = session.identity().map(|i| i.id);
        let inner = Arc::new(LifecycleInner {
            cfg,
            session: session.clone(),
            workspaces,
            data: Mutex::new(LifecycleData {
                started: false,
                splash_elapsed: false,
                identity,
                workspace: None,
                generation: 0,
                resolving: None,
                published: LifecycleSnapshot {
                    phase: Phase::Starting,
                    workspace: None,
                },
            }),
            notifier: Notifier::new(),
            session_listener: Mutex::new(None),
        });

        let weak: Weak<LifecycleInner> = Arc::downgrade(&inner);
        let listener = session.subscribe(move |identity| {
            if let Some(inner) = weak.upgrade() {
                AppLifecycle { inner }.on_session_changed(identity.clone());
            }
        });
        *inner.session_listener.lock() = Some(listener);

        Self { inner }
    }

    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    pub fn phase(&self) -> Phase {
        self.inner.data.lock().published.phase
    }

    pub fn workspace(&self) -> Option<Workspace> {
        self.inner.data.lock().published.workspace.clone()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        self.inner.data.lock().published.clone()
    }

    pub fn subscribe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&LifecycleSnapshot) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    pub fn stream(&self) -> broadcast::Receiver<LifecycleSnapshot> {
        self.inner.notifier.stream()
    }

    /// Runs the splash timer and one-time initialization concurrently, then
    /// leaves Starting. Only the first call does anything.
    pub async fn start(&self) {
        {
            let mut data = self.inner.data.lock();
            if data.started {
                tracing::warn!("lifecycle: start called twice");
                return;
            }
            data.started = true;
        }

        let splash = Duration::from_millis(self.inner.cfg.splash_ms);
        tracing::debug!(splash_ms = self.inner.cfg.splash_ms, "lifecycle: starting");

        let ((), init) = tokio::join!(tokio::time::sleep(splash), self.inner.session.bootstrap());
        if let Err(e) = init {
            tracing::warn!("lifecycle: app initialization failed: {e:#}");
        }

        self.inner.data.lock().splash_elapsed = true;
        self.publish();
    }

    /// Resolves once the published phase equals `phase`.
    pub async fn wait_for(&self, phase: Phase) -> LifecycleSnapshot {
        let mut rx = self.stream();
        loop {
            let current = self.snapshot();
            if current.phase == phase {
                return current;
            }
            match rx.recv().await {
                Ok(snapshot) if snapshot.phase == phase => return snapshot,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return self.snapshot(),
            }
        }
    }

    /// Detach from the session and abort any in-flight resolution.
    pub fn shutdown(&self) {
        if let Some(id) = self.inner.session_listener.lock().take() {
            self.inner.session.unsubscribe(id);
        }
        let mut data = self.inner.data.lock();
        data.generation += 1;
        if let Some(task) = data.resolving.take() {
            task.abort();
        }
    }

    fn on_session_changed(&self, identity: Option<Identity>) {
        let generation = {
            let mut data = self.inner.data.lock();
            data.generation += 1;
            if let Some(task) = data.resolving.take() {
                task.abort();
                tracing::debug!("lifecycle: cancelled in-flight workspace resolution");
            }
            data.identity = identity.as_ref().map(|i| i.id.clone());
            data.workspace = None;
            data.generation
        };

        // Observers see Loading before resolution starts.
        self.publish();

        if let Some(identity) = identity {
            self.spawn_resolution(identity, generation);
        }
    }

    fn spawn_resolution(&self, identity: Identity, generation: u64) {
        let rt = match tokio::runtime::Handle::try_current() {
            Ok(rt) => rt,
            Err(_) => {
                tracing::error!(identity = %identity.id, "lifecycle: no async runtime, workspace not resolved");
                return;
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let workspaces = Arc::clone(&self.inner.workspaces);
        let handle = rt.spawn(async move {
            tracing::debug!(identity = %identity.id, provider = workspaces.name(), "lifecycle: resolving workspace");
            let result = workspaces.resolve(&identity.id).await;
            if let Some(inner) = weak.upgrade() {
                AppLifecycle { inner }.finish_resolution(generation, &identity, result);
            }
        });

        let mut data = self.inner.data.lock();
        if data.generation == generation {
            data.resolving = Some(handle);
        } else {
            // superseded while observers were being notified
            handle.abort();
        }
    }

    fn finish_resolution(
        &self,
        generation: u64,
        identity: &Identity,
        result: anyhow::Result<Option<Workspace>>,
    ) {
        let workspace = match result {
            Ok(Some(ws)) => Some(ws),
            Ok(None) => {
                tracing::warn!(identity = %identity.id, "lifecycle: no workspace, logging out");
                None
            }
            Err(e) => {
                tracing::warn!(identity = %identity.id, "lifecycle: workspace resolution failed, logging out: {e:#}");
                None
            }
        };

        {
            let mut data = self.inner.data.lock();
            if data.generation != generation {
                tracing::debug!(identity = %identity.id, "lifecycle: dropping stale workspace result");
                return;
            }
            data.resolving = None;
            match workspace {
                Some(ws) => data.workspace = Some(ws),
                None => {
                    drop(data);
                    // The session notification clears the workspace and publishes LoggedOut.
                    self.inner.session.logout();
                    return;
                }
            }
        }

        self.publish();
    }

    fn publish(&self) {
        let snapshot = {
            let mut data = self.inner.data.lock();
            let phase = StateTransition::derive(
                data.splash_elapsed,
                data.identity.is_some(),
                data.workspace.is_some(),
            );
            let snapshot = LifecycleSnapshot {
                phase,
                workspace: data.workspace.clone(),
            };
            if snapshot == data.published {
                return;
            }

            let from = data.published.phase;
            if let Err(e) = StateTransition::validate(from, phase) {
                tracing::error!("lifecycle: {e}");
            }
            if from != phase {
                tracing::info!(
                    from = %from,
                    to = %phase,
                    "lifecycle: {}",
                    StateTransition::phase_description(phase)
                );
            }
            data.published = snapshot.clone();
            snapshot
        };

        self.inner.notifier.notify(&snapshot);
    }
}

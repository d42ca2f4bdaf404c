#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shellgate_core::api::{
    AppConfig, AppContext, Identity, IdentityProvider, LifecycleConfig, MemoryStore,
    NavigationConfig, Phase, Screen, Services, Workspace, WorkspaceProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Shared ordered log for asserting interleavings across components.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub struct FakeIdentity {
    pub sign_in_as: String,
    pub stored: Option<Identity>,
    pub delay: Duration,
    pub changes: broadcast::Sender<Option<Identity>>,
}

impl FakeIdentity {
    pub fn new(sign_in_as: &str) -> Self {
        let (changes, _) = broadcast::channel(8);
        Self {
            sign_in_as: sign_in_as.to_string(),
            stored: None,
            delay: Duration::from_millis(300),
            changes,
        }
    }

    pub fn with_stored(mut self, id: &str) -> Self {
        self.stored = Some(Identity::new(id));
        self
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn name(&self) -> &str {
        "fake"
    }

    async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
        Ok(self.stored.clone())
    }

    async fn sign_in(&self) -> anyhow::Result<Identity> {
        tokio::time::sleep(self.delay).await;
        Ok(Identity::new(self.sign_in_as.clone()))
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn changes(&self) -> Option<broadcast::Receiver<Option<Identity>>> {
        Some(self.changes.subscribe())
    }
}

pub struct FakeWorkspaces {
    pub delay: Duration,
    pub fail_for: Vec<String>,
    pub error_for: Vec<String>,
    pub log: EventLog,
}

impl FakeWorkspaces {
    pub fn new(log: EventLog) -> Self {
        Self {
            delay: Duration::from_millis(1_000),
            fail_for: Vec::new(),
            error_for: Vec::new(),
            log,
        }
    }

    pub fn failing_for(mut self, id: &str) -> Self {
        self.fail_for.push(id.to_string());
        self
    }

    /// Resolution for `id` errors instead of yielding no workspace.
    pub fn erroring_for(mut self, id: &str) -> Self {
        self.error_for.push(id.to_string());
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

#[async_trait]
impl WorkspaceProvider for FakeWorkspaces {
    fn name(&self) -> &str {
        "fake"
    }

    async fn resolve(&self, identity_id: &str) -> anyhow::Result<Option<Workspace>> {
        self.log.lock().push(format!("resolve:{identity_id}"));
        tokio::time::sleep(self.delay).await;
        self.log.lock().push(format!("resolved:{identity_id}"));
        if self.error_for.iter().any(|id| id == identity_id) {
            anyhow::bail!("workspace backend unavailable for {identity_id}");
        }
        if self.fail_for.iter().any(|id| id == identity_id) {
            return Ok(None);
        }
        Ok(Some(Workspace::new(identity_id)))
    }
}

pub fn config(splash_ms: u64, logout_navigates_home: bool) -> AppConfig {
    AppConfig {
        lifecycle: LifecycleConfig { splash_ms },
        navigation: NavigationConfig {
            logout_navigates_home,
            redirect_limit: 5,
        },
        ..Default::default()
    }
}

/// Route library logs to the test harness; repeated calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("shellgate_core=debug")
        .with_test_writer()
        .try_init();
}

pub async fn context(
    cfg: AppConfig,
    identity: Arc<FakeIdentity>,
    workspaces: Arc<FakeWorkspaces>,
    store: Arc<MemoryStore>,
) -> AppContext {
    init_test_logging();
    let services = Services {
        identity,
        workspaces,
        settings_store: store,
    };
    AppContext::from_services(cfg, services).await
}

/// Current phase followed by every published phase change.
pub fn record_phases(ctx: &AppContext) -> Arc<Mutex<Vec<Phase>>> {
    let phases = Arc::new(Mutex::new(vec![ctx.lifecycle().phase()]));
    let sink = Arc::clone(&phases);
    ctx.lifecycle().subscribe(move |snapshot| {
        let mut phases = sink.lock();
        if phases.last() != Some(&snapshot.phase) {
            phases.push(snapshot.phase);
        }
    });
    phases
}

/// Rendered location of every screen the navigator publishes.
pub fn record_screens(ctx: &AppContext) -> Arc<Mutex<Vec<String>>> {
    let screens = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&screens);
    ctx.navigator().subscribe(move |screen| sink.lock().push(render(screen)));
    screens
}

pub fn render(screen: &Screen) -> String {
    match screen {
        Screen::Page { location, .. } => location.to_string(),
        Screen::Error { requested, .. } => format!("error:{requested}"),
    }
}

pub fn current(ctx: &AppContext) -> String {
    render(&ctx.navigator().current())
}

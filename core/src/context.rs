use crate::config::AppConfig;
use crate::error::{ServiceError, SessionError};
use crate::router::{Navigator, RouteTable, Screen};
use crate::settings::{KeyValueStore, SettingsStore, ThemeMode};
use crate::state::{
    AppLifecycle, Identity, IdentityProvider, SessionState, StateSnapshot, WorkspaceProvider,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub workspaces: Arc<dyn WorkspaceProvider>,
    pub settings_store: Arc<dyn KeyValueStore>,
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, ServiceError>;
}

/// Everything the shell needs, built once at startup and handed to the
/// rendering layer.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    session: SessionState,
    lifecycle: AppLifecycle,
    navigator: Navigator,
    settings: SettingsStore,
}

impl AppContext {
    pub async fn new(cfg: AppConfig, factory: &dyn ServicesFactory) -> Result<Self, ServiceError> {
        let services = factory.build_services(&cfg).await?;
        Ok(Self::from_services(cfg, services).await)
    }

    /// Settings are loaded here, before any screen exists.
    pub async fn from_services(cfg: AppConfig, services: Services) -> Self {
        Self::with_routes(cfg, services, RouteTable::default()).await
    }

    pub async fn with_routes(cfg: AppConfig, services: Services, routes: RouteTable) -> Self {
        let settings = SettingsStore::load(services.settings_store).await;
        let session = SessionState::new(services.identity);
        let lifecycle = AppLifecycle::new(
            cfg.lifecycle.clone(),
            session.clone(),
            services.workspaces,
        );
        let navigator = Navigator::new(routes, lifecycle.clone(), cfg.navigation.redirect_limit);

        Self {
            cfg,
            session,
            lifecycle,
            navigator,
            settings,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn lifecycle(&self) -> &AppLifecycle {
        &self.lifecycle
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Splash plus one-time initialization; returns once Starting is left.
    pub async fn start(&self) {
        self.lifecycle.start().await;
    }

    pub async fn login(&self) -> Result<Identity, SessionError> {
        self.session.sign_in().await
    }

    pub fn logout(&self) -> bool {
        if !self.session.logged_in() {
            return false;
        }
        if self.cfg.navigation.logout_navigates_home {
            self.navigator.go_home();
        }
        self.session.logout()
    }

    pub fn navigate(&self, target: &str) -> Screen {
        self.navigator.go_str(target)
    }

    pub fn open<I, K, V>(&self, name: &str, params: I) -> Screen
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.navigator.go_named(name, params)
    }

    pub fn set_theme(&self, mode: Option<ThemeMode>) -> bool {
        self.settings.set(mode)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let lifecycle = self.lifecycle.snapshot();
        let screen = self.navigator.current();
        let (location, error) = match &screen {
            Screen::Page { location, .. } => (location.to_string(), None),
            Screen::Error { requested, message } => (requested.clone(), Some(message.clone())),
        };

        StateSnapshot {
            captured_at: chrono::Utc::now(),
            phase: lifecycle.phase,
            identity: self.session.identity(),
            workspace: lifecycle.workspace,
            location,
            error,
            theme: self.settings.theme_mode(),
        }
    }

    /// Detach observers, abort in-flight work and wait for pending settings writes.
    pub async fn shutdown(&self) {
        self.navigator.shutdown();
        self.lifecycle.shutdown();
        self.session.shutdown();
        self.settings.flush().await;
    }
}

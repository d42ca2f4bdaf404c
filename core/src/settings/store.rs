use super::kv::KeyValueStore;
use crate::state::{ListenerId, Notifier};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub const THEME_MODE_KEY: &str = "theme_mode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode '{other}'")),
        }
    }
}

/// Display preferences, loaded once before the shell is built.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

struct SettingsInner {
    store: Arc<dyn KeyValueStore>,
    theme_mode: Mutex<ThemeMode>,
    notifier: Notifier<ThemeMode>,
    /// Most recent background write; each write waits for the one before it.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SettingsStore {
    /// Unreadable or invalid stored values fall back to [`ThemeMode::System`].
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let theme_mode = match store.get_string(THEME_MODE_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(store = store.name(), "settings: {e}, using default");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                tracing::warn!(store = store.name(), "settings: load failed, using default: {e:#}");
                ThemeMode::default()
            }
        };
        tracing::debug!(theme_mode = %theme_mode, "settings: loaded");

        Self {
            inner: Arc::new(SettingsInner {
                store,
                theme_mode: Mutex::new(theme_mode),
                notifier: Notifier::new(),
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        *self.inner.theme_mode.lock()
    }

    pub fn subscribe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&ThemeMode) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    pub fn stream(&self) -> broadcast::Receiver<ThemeMode> {
        self.inner.notifier.stream()
    }

    /// Returns `false` for an absent or unchanged value. Otherwise notifies and
    /// persists in the background; persistence errors are only logged.
    pub fn set(&self, mode: Option<ThemeMode>) -> bool {
        let Some(mode) = mode else {
            return false;
        };
        {
            let mut current = self.inner.theme_mode.lock();
            if *current == mode {
                return false;
            }
            *current = mode;
        }

        tracing::info!(theme_mode = %mode, "settings: theme changed");
        self.inner.notifier.notify(&mode);
        self.persist(mode);
        true
    }

    /// Like [`set`](Self::set); strings that name no theme mode are ignored.
    pub fn set_str(&self, raw: &str) -> bool {
        self.set(raw.parse().ok())
    }

    /// Wait for background writes issued so far.
    pub async fn flush(&self) {
        let pending = self.inner.pending.lock().take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }
    }

    fn persist(&self, mode: ThemeMode) {
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("settings: no async runtime, theme not persisted");
            return;
        };

        let store = Arc::clone(&self.inner.store);
        let mut pending = self.inner.pending.lock();
        let previous = pending.take();
        *pending = Some(rt.spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            if let Err(e) = store.set_string(THEME_MODE_KEY, mode.as_str()).await {
                tracing::warn!(store = store.name(), "settings: persist failed: {e:#}");
            }
        }));
    }
}

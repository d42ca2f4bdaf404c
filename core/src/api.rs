//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `shellgate_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, AppConfig, IdentityConfig, LifecycleConfig, LoggingConfig,
    FileSettingsConfig, NavigationConfig, SettingsConfig, StubIdentityConfig, StubWorkspaceConfig, WorkspaceConfig,
};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::error::{CliError, NavError, ServiceError, SessionError};
pub use crate::router::{redirect, Location, Navigator, RouteTable, Screen};
pub use crate::settings::{KeyValueStore, MemoryStore, SettingsStore, ThemeMode};
pub use crate::state::{
    AppLifecycle, Identity, IdentityProvider, LifecycleSnapshot, ListenerId, Phase,
    SessionState, StateSnapshot, Workspace, WorkspaceProvider,
};

mod load;
mod types;

pub use load::{get_shellgate_data_dir, load_default, load_from_path};
pub use types::{
    AppConfig, FileSettingsConfig, IdentityConfig, LifecycleConfig, LoggingConfig,
    NavigationConfig, SettingsConfig, StubIdentityConfig, StubWorkspaceConfig, WorkspaceConfig,
};

use shellgate_core::api::{
    AppConfig, IdentityConfig, IdentityProvider, KeyValueStore, MemoryStore, ServiceError,
    SettingsConfig, WorkspaceConfig, WorkspaceProvider,
};
use std::sync::Arc;

use crate::identity::StubIdentityProvider;
use crate::settings::JsonFileStore;
use crate::workspace::StubWorkspaceProvider;

pub fn build_identity(cfg: &AppConfig) -> Arc<dyn IdentityProvider> {
    match &cfg.identity {
        IdentityConfig::Stub(stub_cfg) => Arc::new(StubIdentityProvider::new(stub_cfg)),
    }
}

pub fn build_workspaces(cfg: &AppConfig) -> Arc<dyn WorkspaceProvider> {
    match &cfg.workspace {
        WorkspaceConfig::Stub(stub_cfg) => Arc::new(StubWorkspaceProvider::new(stub_cfg)),
    }
}

pub fn build_settings_store(cfg: &AppConfig) -> Result<Arc<dyn KeyValueStore>, ServiceError> {
    match &cfg.settings {
        SettingsConfig::File(file_cfg) => {
            if file_cfg.path.trim().is_empty() {
                return Err(ServiceError::Config("settings.path is empty".to_string()));
            }
            Ok(Arc::new(JsonFileStore::new(&file_cfg.path)))
        }
        SettingsConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

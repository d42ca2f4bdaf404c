//! `ServicesFactory` backed by this crate's providers, shared by the CLI.
use async_trait::async_trait;
use shellgate_core::api::{AppConfig, ServiceError, Services, ServicesFactory};

use crate::factory;

#[derive(Default)]
pub struct PluginServicesFactory;

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, ServiceError> {
        let identity = factory::build_identity(cfg);
        let workspaces = factory::build_workspaces(cfg);
        let settings_store = factory::build_settings_store(cfg)?;
        tracing::debug!(
            target: "shellgate.services",
            identity = identity.name(),
            workspaces = workspaces.name(),
            settings = settings_store.name(),
            "services built"
        );
        Ok(Services {
            identity,
            workspaces,
            settings_store,
        })
    }
}

use anyhow::Result;
use async_trait::async_trait;
use shellgate_core::api::{Identity, IdentityProvider, StubIdentityConfig};
use std::time::Duration;
use tokio::sync::broadcast;

/// Hands out one fixed identity after a delay, standing in for a real sign-in flow.
pub struct StubIdentityProvider {
    identity: Identity,
    delay: Duration,
    restore: bool,
    changes: broadcast::Sender<Option<Identity>>,
}

impl StubIdentityProvider {
    pub fn new(cfg: &StubIdentityConfig) -> Self {
        let mut identity = Identity::new(cfg.identity_id.clone());
        identity.display_name = cfg.display_name.clone();
        let (changes, _) = broadcast::channel(16);
        Self {
            identity,
            delay: Duration::from_millis(cfg.delay_ms),
            restore: cfg.restore,
            changes,
        }
    }

    /// Simulate the credential expiring at the provider.
    pub fn expire(&self) {
        tracing::info!(
            target: "shellgate.identity",
            identity = %self.identity.id,
            "stub credential expired"
        );
        let _ = self.changes.send(None);
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn initialize(&self) -> Result<()> {
        tracing::debug!(target: "shellgate.identity", stage = "init", restore = self.restore);
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.restore.then(|| self.identity.clone()))
    }

    async fn sign_in(&self) -> Result<Identity> {
        tracing::debug!(target: "shellgate.identity", stage = "sign_in.in", delay_ms = self.delay.as_millis() as u64);
        tokio::time::sleep(self.delay).await;
        tracing::debug!(target: "shellgate.identity", stage = "sign_in.out", identity = %self.identity.id);
        Ok(self.identity.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(target: "shellgate.identity", stage = "sign_out.out");
        Ok(())
    }

    fn changes(&self) -> Option<broadcast::Receiver<Option<Identity>>> {
        Some(self.changes.subscribe())
    }
}

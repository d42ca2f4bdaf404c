use super::types::{Identity, Workspace};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Backend that authenticates users. Implementations live in `shellgate-plugins`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One-time bootstrap, run concurrently with the splash timer.
    async fn initialize(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// A credential persisted by an earlier run, if any.
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>>;

    async fn sign_in(&self) -> anyhow::Result<Identity>;

    async fn sign_out(&self) -> anyhow::Result<()>;

    /// Changes that originate at the provider (token expiry, sign-out elsewhere).
    fn changes(&self) -> Option<broadcast::Receiver<Option<Identity>>> {
        None
    }
}

#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means the user has no usable workspace.
    async fn resolve(&self, identity_id: &str) -> anyhow::Result<Option<Workspace>>;
}

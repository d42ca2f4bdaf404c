use anyhow::Result;
use async_trait::async_trait;
use shellgate_core::api::{StubWorkspaceConfig, Workspace, WorkspaceProvider};
use std::collections::HashSet;
use std::time::Duration;

/// Resolves a fresh workspace after a delay, or nothing for configured identities.
pub struct StubWorkspaceProvider {
    delay: Duration,
    fail_for: HashSet<String>,
}

impl StubWorkspaceProvider {
    pub fn new(cfg: &StubWorkspaceConfig) -> Self {
        Self {
            delay: Duration::from_millis(cfg.delay_ms),
            fail_for: cfg.fail_for.iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl WorkspaceProvider for StubWorkspaceProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn resolve(&self, identity_id: &str) -> Result<Option<Workspace>> {
        tracing::debug!(target: "shellgate.workspace", stage = "resolve.in", identity = %identity_id);
        tokio::time::sleep(self.delay).await;

        if self.fail_for.contains(identity_id) {
            tracing::debug!(target: "shellgate.workspace", stage = "resolve.out", identity = %identity_id, found = false);
            return Ok(None);
        }

        let workspace = Workspace::new(identity_id);
        tracing::debug!(target: "shellgate.workspace", stage = "resolve.out", identity = %identity_id, workspace = %workspace.id);
        Ok(Some(workspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_resolves_unless_configured_to_fail() {
        let provider = StubWorkspaceProvider::new(&StubWorkspaceConfig {
            delay_ms: 1_000,
            fail_for: vec!["mallory".to_string()],
        });

        let ws = provider.resolve("alice").await.unwrap().unwrap();
        assert_eq!(ws.owner, "alice");
        assert!(provider.resolve("mallory").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_resolution_is_a_new_workspace() {
        let provider = StubWorkspaceProvider::new(&StubWorkspaceConfig::default());
        let a = provider.resolve("alice").await.unwrap().unwrap();
        let b = provider.resolve("alice").await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
    }
}

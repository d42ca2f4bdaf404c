use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "shellgate_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Minimum time the splash route stays up, even when startup work is faster.
    #[serde(default = "default_splash_ms")]
    pub splash_ms: u64,
}

fn default_splash_ms() -> u64 {
    2_000
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            splash_ms: default_splash_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum IdentityConfig {
    #[serde(rename = "stub")]
    Stub(StubIdentityConfig),
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self::Stub(StubIdentityConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubIdentityConfig {
    #[serde(default = "default_identity_id")]
    pub identity_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Simulated latency of sign-in and sign-out.
    #[serde(default = "default_identity_delay_ms")]
    pub delay_ms: u64,

    /// Pretend a credential was stored by a previous run.
    #[serde(default)]
    pub restore: bool,
}

fn default_identity_id() -> String {
    "demo-user".to_string()
}

fn default_identity_delay_ms() -> u64 {
    500
}

impl Default for StubIdentityConfig {
    fn default() -> Self {
        Self {
            identity_id: default_identity_id(),
            display_name: None,
            delay_ms: default_identity_delay_ms(),
            restore: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum WorkspaceConfig {
    #[serde(rename = "stub")]
    Stub(StubWorkspaceConfig),
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::Stub(StubWorkspaceConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubWorkspaceConfig {
    #[serde(default = "default_workspace_delay_ms")]
    pub delay_ms: u64,

    /// Identity ids for which resolution yields no workspace.
    #[serde(default)]
    pub fail_for: Vec<String>,
}

fn default_workspace_delay_ms() -> u64 {
    1_000
}

impl Default for StubWorkspaceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_workspace_delay_ms(),
            fail_for: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "store")]
pub enum SettingsConfig {
    #[serde(rename = "file")]
    File(FileSettingsConfig),
    #[serde(rename = "memory")]
    Memory,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self::File(FileSettingsConfig::default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSettingsConfig {
    /// JSON file holding the key-value pairs. Filled in by the loader when empty.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Navigate home before logging out, so the login route carries no `from`.
    #[serde(default = "default_logout_navigates_home")]
    pub logout_navigates_home: bool,

    #[serde(default = "default_redirect_limit")]
    pub redirect_limit: usize,
}

fn default_logout_navigates_home() -> bool {
    true
}

fn default_redirect_limit() -> usize {
    5
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            logout_navigates_home: default_logout_navigates_home(),
            redirect_limit: default_redirect_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.lifecycle.splash_ms, 2_000);
        assert!(cfg.navigation.logout_navigates_home);
        assert_eq!(cfg.navigation.redirect_limit, 5);
        assert!(matches!(cfg.settings, SettingsConfig::File(_)));
        let IdentityConfig::Stub(id) = cfg.identity;
        assert_eq!(id.identity_id, "demo-user");
    }

    #[test]
    fn test_tagged_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [lifecycle]
            splash_ms = 10

            [settings]
            store = "memory"

            [workspace]
            provider = "stub"
            delay_ms = 5
            fail_for = ["mallory"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.lifecycle.splash_ms, 10);
        assert!(matches!(cfg.settings, SettingsConfig::Memory));
        let WorkspaceConfig::Stub(ws) = cfg.workspace;
        assert_eq!(ws.delay_ms, 5);
        assert_eq!(ws.fail_for, vec!["mallory".to_string()]);
    }
}

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::{AppConfig, IdentityConfig, SettingsConfig};

/// Get the default shellgate data directory: ~/.shellgate
pub fn get_shellgate_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".shellgate"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.shellgate/config.toml (highest), skipped without a home dir
    let home_config = get_shellgate_data_dir()
        .ok()
        .map(|dir| dir.join("config.toml"))
        .filter(|p| p.exists());

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let cfg = if let Some(home_config) = home_config {
        read_config(&home_config)?
    } else if local_config.exists() {
        read_config(local_config)?
    } else {
        AppConfig::default()
    };

    finish(cfg, get_shellgate_data_dir)
}

/// Load an explicit config file; nothing else is consulted except env overrides.
pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let cfg = read_config(path)?;
    finish(cfg, get_shellgate_data_dir)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str::<AppConfig>(&s).with_context(|| format!("invalid config {}", path.display()))
}

fn finish(
    mut cfg: AppConfig,
    data_dir: impl FnOnce() -> anyhow::Result<PathBuf>,
) -> anyhow::Result<AppConfig> {
    apply_env_overrides(&mut cfg)?;
    fill_settings_path(&mut cfg, data_dir)?;
    Ok(cfg)
}

/// The data dir is only resolved when a file store has no explicit path.
fn fill_settings_path(
    cfg: &mut AppConfig,
    data_dir: impl FnOnce() -> anyhow::Result<PathBuf>,
) -> anyhow::Result<()> {
    if let SettingsConfig::File(ref mut file_cfg) = cfg.settings {
        if file_cfg.path.trim().is_empty() {
            let dir = data_dir().context("settings.path is empty")?;
            file_cfg.path = dir.join("settings.json").to_string_lossy().to_string();
        }
    }
    Ok(())
}

/// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig) -> anyhow::Result<()> {
    if let Some(v) = non_empty_env("SHELLGATE_SPLASH_MS") {
        cfg.lifecycle.splash_ms = v
            .parse()
            .with_context(|| format!("SHELLGATE_SPLASH_MS is not a number: {v}"))?;
    }

    if let Some(v) = non_empty_env("SHELLGATE_IDENTITY_ID") {
        let IdentityConfig::Stub(ref mut stub) = cfg.identity;
        stub.identity_id = v;
    }

    if let Some(v) = non_empty_env("SHELLGATE_SETTINGS_PATH") {
        cfg.settings = SettingsConfig::File(super::types::FileSettingsConfig { path: v });
    }

    if let Some(v) = non_empty_env("SHELLGATE_LOG_LEVEL") {
        cfg.logging.level = v;
    }

    Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

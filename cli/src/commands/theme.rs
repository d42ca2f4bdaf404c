use shellgate_core::api::{AppConfig, CliError, SettingsStore, ThemeMode};
use shellgate_plugins::factory;

use super::cli::ThemeAction;

pub async fn run(cfg: &AppConfig, action: ThemeAction) -> Result<i32, CliError> {
    let store = factory::build_settings_store(cfg)?;
    let settings = SettingsStore::load(store).await;

    match action {
        ThemeAction::Get => {
            println!("{}", settings.theme_mode());
        }
        ThemeAction::Set { mode } => {
            let mode: ThemeMode = mode.parse().map_err(CliError::Command)?;
            if settings.set(Some(mode)) {
                settings.flush().await;
            }
            println!("{}", settings.theme_mode());
        }
    }
    Ok(0)
}

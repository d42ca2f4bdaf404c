use clap::Parser;
use shellgate_cli::commands::{cli, redirect, theme};
use shellgate_cli::{logging, shell};
use shellgate_core::api::{AppConfig, AppContext, CliError, ServiceError};
use shellgate_plugins::services::PluginServicesFactory;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(args.config.as_deref())?;
    logging::init(&cfg.logging).map_err(CliError::Command)?;
    tracing::debug!(settings = ?cfg.settings, "config loaded");

    match args.command.unwrap_or(cli::Commands::Shell) {
        cli::Commands::Shell => {
            let ctx = AppContext::new(cfg, &PluginServicesFactory).await?;
            shell::run(ctx).await
        }
        cli::Commands::Redirect(r) => redirect::run(&r.phase, &r.location),
        cli::Commands::Theme(t) => theme::run(&cfg, t.action).await,
    }
}

fn load_config(path: Option<&str>) -> Result<AppConfig, CliError> {
    let loaded = match path {
        Some(p) => shellgate_core::api::load_from_path(std::path::Path::new(p)),
        None => shellgate_core::api::load_default(),
    };
    loaded.map_err(|e| CliError::Config(format!("{e:#}")))
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: service / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Service(se) => match se {
            ServiceError::Config(_) => 11,
            ServiceError::Plugin(_) => 20,
        },
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Nav(_) => 20,
        CliError::Session(_) => 50,
        CliError::Anyhow(_) => 50,
    }
}

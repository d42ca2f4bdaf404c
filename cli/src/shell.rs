use shellgate_core::api::{AppContext, CliError, ThemeMode};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::ConsoleRenderer;

const HELP: &str = "commands: login | logout | go <location> | open <route> [key=value..] | theme [system|light|dark] | status [json] | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login,
    Logout,
    Go(String),
    Open {
        route: String,
        params: Vec<(String, String)>,
    },
    Theme(Option<String>),
    Status { json: bool },
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("empty command".to_string());
        };
        let rest: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("login", []) => Ok(ShellCommand::Login),
            ("logout", []) => Ok(ShellCommand::Logout),
            ("go", [target]) => Ok(ShellCommand::Go((*target).to_string())),
            ("open", [route, params @ ..]) => {
                let params = params
                    .iter()
                    .map(|p| {
                        p.split_once('=')
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .ok_or_else(|| format!("expected key=value, got '{p}'"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ShellCommand::Open {
                    route: (*route).to_string(),
                    params,
                })
            }
            ("theme", []) => Ok(ShellCommand::Theme(None)),
            ("theme", [mode]) => Ok(ShellCommand::Theme(Some((*mode).to_string()))),
            ("status", []) => Ok(ShellCommand::Status { json: false }),
            ("status", ["json"]) => Ok(ShellCommand::Status { json: true }),
            ("help" | "?", []) => Ok(ShellCommand::Help),
            ("quit" | "exit", []) => Ok(ShellCommand::Quit),
            (other, _) => Err(format!("unrecognized command '{other}'")),
        }
    }
}

/// Applies one command. Returns `false` when the shell should exit.
pub fn apply(ctx: &AppContext, renderer: &ConsoleRenderer, cmd: ShellCommand) -> bool {
    match cmd {
        ShellCommand::Login => {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Err(e) = ctx.login().await {
                    println!("[error] {e}");
                }
            });
        }
        ShellCommand::Logout => {
            if !ctx.logout() {
                println!("[info] not logged in");
            }
        }
        ShellCommand::Go(target) => {
            ctx.navigate(&target);
        }
        ShellCommand::Open { route, params } => {
            ctx.open(&route, params);
        }
        ShellCommand::Theme(None) => println!("[theme] {}", ctx.settings().theme_mode()),
        ShellCommand::Theme(Some(raw)) => match raw.parse::<ThemeMode>() {
            Ok(mode) => {
                ctx.set_theme(Some(mode));
            }
            Err(e) => println!("[error] {e}"),
        },
        ShellCommand::Status { json: false } => renderer.status(ctx),
        ShellCommand::Status { json: true } => match ctx.snapshot().to_json() {
            Ok(body) => println!("{body}"),
            Err(e) => println!("[error] {e:#}"),
        },
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return false,
    }
    true
}

pub async fn run(ctx: AppContext) -> Result<i32, CliError> {
    let renderer = ConsoleRenderer::attach(&ctx);
    println!("{HELP}");

    let starter = {
        let ctx = ctx.clone();
        tokio::spawn(async move { ctx.start().await })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ShellCommand>() {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "shell command");
                        if !apply(&ctx, &renderer, cmd) {
                            break;
                        }
                    }
                    Err(e) => println!("[error] {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    starter.abort();
    renderer.detach(&ctx);
    ctx.shutdown().await;
    Ok(0)
}

//! Line-oriented renderer: one printed frame per published change.

use shellgate_core::api::{AppContext, LifecycleSnapshot, ListenerId, Screen, StateSnapshot};
use shellgate_core::state::transitions::StateTransition;
use std::io::Write;

pub fn screen_frame(screen: &Screen) -> String {
    match screen {
        Screen::Page { name, location } => format!("[screen] {name} {location}"),
        Screen::Error { requested, message } => {
            format!("[screen] error '{requested}': {message} (type `go /` for home)")
        }
    }
}

pub fn phase_frame(snapshot: &LifecycleSnapshot) -> String {
    match &snapshot.workspace {
        Some(ws) => format!(
            "[phase] {} ({}, workspace {})",
            snapshot.phase,
            StateTransition::phase_description(snapshot.phase),
            ws.id
        ),
        None => format!(
            "[phase] {} ({})",
            snapshot.phase,
            StateTransition::phase_description(snapshot.phase)
        ),
    }
}

pub fn status_frame(snapshot: &StateSnapshot) -> String {
    let who = snapshot
        .identity
        .as_ref()
        .map(|i| i.label().to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "[status] phase={} identity={} location={} theme={}",
        snapshot.phase, who, snapshot.location, snapshot.theme
    );
    if let Some(err) = &snapshot.error {
        line.push_str(&format!(" error=\"{err}\""));
    }
    line
}

fn emit(line: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{line}");
}

/// Subscribes to navigator, lifecycle and settings for as long as it is attached.
pub struct ConsoleRenderer {
    screen_listener: ListenerId,
    phase_listener: ListenerId,
    theme_listener: ListenerId,
}

impl ConsoleRenderer {
    pub fn attach(ctx: &AppContext) -> Self {
        emit(&screen_frame(&ctx.navigator().current()));
        emit(&format!("[theme] {}", ctx.settings().theme_mode()));

        let screen_listener = ctx
            .navigator()
            .subscribe(|screen| emit(&screen_frame(screen)));
        let phase_listener = ctx
            .lifecycle()
            .subscribe(|snapshot| emit(&phase_frame(snapshot)));
        let theme_listener = ctx
            .settings()
            .subscribe(|mode| emit(&format!("[theme] {mode}")));

        Self {
            screen_listener,
            phase_listener,
            theme_listener,
        }
    }

    pub fn status(&self, ctx: &AppContext) {
        emit(&status_frame(&ctx.snapshot()));
    }

    pub fn detach(self, ctx: &AppContext) {
        ctx.navigator().unsubscribe(self.screen_listener);
        ctx.lifecycle().unsubscribe(self.phase_listener);
        ctx.settings().unsubscribe(self.theme_listener);
    }
}

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shellgate", version, about = "Guarded navigation shell")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to load instead of the default lookup.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RedirectArgs {
    /// Lifecycle phase to evaluate against (starting, logged_out, loading, ready).
    #[arg(long)]
    pub phase: String,

    /// Requested location, e.g. `/settings?tab=theme`.
    #[arg(long)]
    pub location: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeAction {
    /// Print the stored theme mode.
    Get,
    /// Store a theme mode (system, light, dark).
    Set { mode: String },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: ThemeAction,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive shell (default).
    Shell,
    /// Evaluate the redirect policy once and print the outcome.
    Redirect(RedirectArgs),
    /// Read or write the persisted theme mode.
    Theme(ThemeArgs),
}

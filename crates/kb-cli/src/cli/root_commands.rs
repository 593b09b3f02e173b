use clap::{Args, Subcommand};

use crate::cli::subcommands::{CategoryCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database and a starter `.knowledge/config.toml`.
    Init(InitArgs),
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// List queued response alerts.
    Alerts(AlertsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Do not write `.knowledge/config.toml`.
    #[arg(long)]
    pub no_config: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,
    /// Listen port (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct AlertsArgs {
    /// Only alerts about this question.
    #[arg(long)]
    pub question: Option<i64>,
    /// Max alerts to return (defaults to `general.default_limit`).
    #[arg(short, long)]
    pub limit: Option<u32>,
}

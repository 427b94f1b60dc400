use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration, read from the command line with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskboard-server", version, about = "Serve the task board over HTTP")]
pub struct Config {
    /// SeaORM connection URL for the task database.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./taskboard.db?mode=rwc")]
    pub database_url: String,

    /// Address to accept HTTP connections on.
    #[arg(long, env = "TASKBOARD_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,
}

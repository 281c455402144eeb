mod capture;
mod config;
mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_http;
mod core_network;
mod core_shell;
mod core_tls;
mod helpers;
mod server;
mod session;

pub use crate::config::Config;
use crate::core_cli::Cli;
use crate::helpers::{load_config, log_config};
use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_filter = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // The TOML file is optional, command-line flags win over it
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            load_config(path)?
        }
        None => Config::default(),
    };
    args.apply(&mut config);
    log_config(&config);

    server::run(config).await
}

//! # Main Entry Point
//!
//! Orchestrates the three independent units of work:
//! - Keep-alive pinger on its own task
//! - Inbound keep-alive HTTP listener
//! - Discord gateway connection, which composes and syncs commands on ready
//!
//! Configuration errors stop the process before any network activity. Once running,
//! the process exits when the gateway or the listener stops for good; the pinger never
//! ends on its own.

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::application::composer::CommandComposer;
use crate::application::keep_alive::KeepAlivePinger;
use crate::application::registry::CommandRegistry;
use crate::domain::config::AppConfig;
use crate::infrastructure::{discord, http};
use crate::interface::commands;
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(name = "beacon", version, about = "Discord bot with a keep-alive loop for its hosting space")]
struct Cli {
    /// Optional YAML file with base settings; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host for the keep-alive endpoint
    #[arg(long)]
    host: Option<String>,

    /// Listen port for the keep-alive endpoint
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Configuration (fatal when incomplete)
    let mut config = AppConfig::load(cli.config.as_deref()).context("Invalid configuration")?;
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    let keep_alive = config.keep_alive().context("Invalid keep-alive configuration")?;

    // 2. Logging
    let _log_guard = application::logging::init(&config.log_level, config.log_file.as_deref())?;
    tracing::info!("{}", logs::STARTING);

    // 3. Keep-alive pinger
    let pinger = KeepAlivePinger::new(keep_alive).context("Failed to build keep-alive client")?;
    tracing::info!(
        "{}",
        logs::keep_alive_started(&pinger.config().target_url, pinger.config().interval.as_secs())
    );
    let _pinger = pinger.spawn();

    // 4. Inbound listener
    let listener = http::bind(&config.http).await?;
    let server = tokio::spawn(http::serve(listener));

    // 5. Gateway
    let registry = CommandRegistry::new().with_namespace(commands::NAMESPACE, commands::units(&config));
    tracing::debug!("Command namespaces: {:?}", registry.namespaces());
    let composer = Arc::new(CommandComposer::new(Arc::new(registry), commands::NAMESPACE));
    let gateway = discord::run(&config.discord_token, composer);

    tokio::select! {
        result = gateway => {
            if let Err(e) = result {
                tracing::error!("{:#}", e);
                return Err(e);
            }
            tracing::warn!("Discord gateway closed");
        }
        joined = server => {
            joined.context("Keep-alive listener panicked")??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{}", logs::SHUTDOWN);
        }
    }

    Ok(())
}

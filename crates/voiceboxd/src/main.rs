//! Voicebox Daemon - chat log archive server
//!
//! Serves configured channels' logs as browsable HTML pages or raw text.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voicebox_common::{Config, DEFAULT_CONFIG_PATH};
use voiceboxd::server::{self, AppState, DEFAULT_LISTEN_ADDR};

#[derive(Parser, Debug)]
#[command(name = "voiceboxd")]
#[command(about = "Serve chat log archives over HTTP", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the YAML config file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to listen on
    #[arg(short, long, value_name = "ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set RUST_LOG to override (e.g. RUST_LOG=voicebox_common=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Voicebox Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&args.config)
        .with_context(|| format!("Invalid config file {}", args.config.display()))?;

    server::run(AppState::new(config), args.listen).await
}

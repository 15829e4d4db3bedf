mod auth;
mod config;
mod configuration;
mod conn;
mod error;
mod handshake;
mod login;
mod logging;
mod palette;
mod play;
mod player;
mod registry;
mod session;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use config::ServerConfig;
use player::PlayerSet;

#[derive(Parser, Debug)]
#[command(name = "mc_server", about = "Minecraft Java Edition 1.21.x protocol server")]
struct Cli {
    #[arg(long, default_value = "server.properties")]
    config: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_level);

    let config = Arc::new(ServerConfig::load(&cli.config)?);
    let players = Arc::new(PlayerSet::new());

    let bind_addr = format!("{}:{}", config.server_ip, config.server_port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, online_mode = config.online_mode, "listening");

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let config = config.clone();
                let players = players.clone();
                tokio::spawn(async move {
                    session::handle(stream, peer_addr, config, players).await;
                });
            }
            Err(e) => {
                error!("failed to accept incoming connection: {e}");
            }
        }
    }
}

mod config;
mod dns;
mod error;
mod logging;
mod relay;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use config::ProxyConfig;

#[derive(Parser, Debug)]
#[command(name = "mc_transfer", about = "Minecraft Java Edition Transfer proxy")]
struct Cli {
    #[arg(long, default_value = "proxy.properties")]
    config: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_level);

    let config = Arc::new(ProxyConfig::load(&cli.config)?);

    let bind_addr = format!("{}:{}", config.listen_ip, config.listen_port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        %bind_addr,
        target = %format!("{}:{}", config.target_host, config.target_port),
        "transfer proxy listening"
    );

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let config = config.clone();
                tokio::spawn(async move {
                    relay::handle(stream, peer_addr, config).await;
                });
            }
            Err(e) => {
                error!("failed to accept incoming connection: {e}");
            }
        }
    }
}

//! Per-connection orchestration (§4.C): dispatches the handshake to the
//! right subprotocol and drives a session through to `play`.

use std::net::SocketAddr;
use std::sync::Arc;

use mc_protocol::packets::handshake::NextState;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use crate::config::ServerConfig;
use crate::conn::Connection;
use crate::error::SessionError;
use crate::player::PlayerSet;
use crate::{configuration, handshake, login, play, status};

#[instrument(skip_all, fields(peer = %peer_addr))]
pub async fn handle(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    players: Arc<PlayerSet>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!("failed to set TCP_NODELAY: {e}");
    }

    let mut conn = Connection::new(stream, peer_addr);

    match run(&mut conn, &config, &players).await {
        Ok(()) => {}
        Err(e) if e.is_clean() => {}
        Err(e) => warn!("connection ended with error: {e:#}"),
    }
}

async fn run(conn: &mut Connection, config: &ServerConfig, players: &PlayerSet) -> Result<(), SessionError> {
    let handshake = handshake::run(conn).await?;

    match handshake.next_state {
        NextState::Status => status::run(conn, config, players, handshake.protocol_version).await,
        NextState::Login | NextState::Transfer => {
            let identity = login::run(conn, config).await?;
            info!(player = %identity.username, "login complete");
            configuration::run(conn, config).await?;
            play::run(conn, players, identity).await
        }
    }
}

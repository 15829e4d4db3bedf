//! Status-state handling (§4.I): MOTD response and ping echo.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use mc_protocol::packets::status::{PingRequestC2s, PongResponseS2c, StatusRequestC2s, StatusResponseS2c};
use serde_json::{json, Value};
use tracing::instrument;

use crate::config::ServerConfig;
use crate::conn::Connection;
use crate::error::SessionError;
use crate::player::PlayerSet;

#[instrument(skip_all, fields(peer = %conn.peer_addr))]
pub async fn run(
    conn: &mut Connection,
    config: &ServerConfig,
    players: &PlayerSet,
    client_protocol_version: i32,
) -> Result<(), SessionError> {
    conn.recv_packet::<StatusRequestC2s>().await?;

    let protocol = if config.protocol == -1 {
        client_protocol_version
    } else {
        config.protocol
    };

    let mut body = json!({
        "version": { "name": config.version, "protocol": protocol },
        "players": {
            "max": config.max_players,
            "online": players.online_count(),
            "sample": sample_json(players),
        },
        "description": { "text": config.motd.replace("\\n", "\n") },
        "enforcesSecureChat": false,
        "previewsChat": false,
    });

    if let Some(favicon) = read_favicon() {
        body["favicon"] = Value::String(favicon);
    }

    conn.send_packet(&StatusResponseS2c {
        json: body.to_string(),
    })
    .await?;

    let ping = conn.recv_packet::<PingRequestC2s>().await?;
    conn.send_packet(&PongResponseS2c { payload: ping.payload }).await?;

    Ok(())
}

fn sample_json(players: &PlayerSet) -> Vec<Value> {
    players
        .sample(10)
        .into_iter()
        .map(|(name, uuid)| json!({ "name": name, "id": uuid.to_string() }))
        .collect()
}

fn read_favicon() -> Option<String> {
    let bytes = std::fs::read("server-icon.png").ok()?;
    Some(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_reports_its_pinned_protocol() {
        let config = ServerConfig::default();
        assert_eq!(config.protocol, mc_protocol::PROTOCOL_VERSION_1_21_8);
    }
}
